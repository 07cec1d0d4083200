//! `sitemap.xml` for the public pages.

pub struct SitemapRoute {
    pub path: &'static str,
    pub change_frequency: &'static str,
    pub priority: f32,
}

pub const ROUTES: [SitemapRoute; 11] = [
    SitemapRoute { path: "", change_frequency: "weekly", priority: 1.0 },
    SitemapRoute { path: "/about", change_frequency: "monthly", priority: 0.8 },
    SitemapRoute { path: "/events", change_frequency: "daily", priority: 0.9 },
    SitemapRoute { path: "/team", change_frequency: "monthly", priority: 0.7 },
    SitemapRoute { path: "/resources", change_frequency: "weekly", priority: 0.7 },
    SitemapRoute { path: "/projects", change_frequency: "monthly", priority: 0.6 },
    SitemapRoute { path: "/gallery", change_frequency: "monthly", priority: 0.5 },
    SitemapRoute { path: "/contact", change_frequency: "yearly", priority: 0.5 },
    SitemapRoute { path: "/join", change_frequency: "monthly", priority: 0.6 },
    SitemapRoute { path: "/login", change_frequency: "yearly", priority: 0.3 },
    SitemapRoute { path: "/signup", change_frequency: "yearly", priority: 0.3 },
];

pub fn render_sitemap(base_url: &str, last_modified: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for route in &ROUTES {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            base_url, route.path, last_modified, route.change_frequency, route.priority
        ));
    }

    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_route_with_absolute_urls() {
        let xml = render_sitemap("https://club.example.edu/", "2025-10-01");
        assert_eq!(xml.matches("<url>").count(), 11);
        assert!(xml.contains("<loc>https://club.example.edu</loc>"));
        assert!(xml.contains("<loc>https://club.example.edu/events</loc>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
    }
}
