use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::AppState;
use crate::sitemap::render_sitemap;

pub async fn sitemap(state: web::Data<AppState>) -> HttpResponse {
    let today = Utc::now().format("%Y-%m-%d").to_string();
    HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(render_sitemap(&state.config.client_base_url, &today))
}
