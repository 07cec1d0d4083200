use actix_web::web;

use crate::error::AppError;
use crate::handlers::sitemap;

pub mod admin;
pub mod api;
pub mod auth;
pub mod content;
pub mod events;

/// Malformed JSON bodies get the same `{success, error}` shape as every
/// other rejection.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::bad_request(format!("Invalid request body: {}", err)).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/sitemap.xml", web::get().to(sitemap::sitemap))
        .service(
            web::scope("/api")
                .configure(auth::configure)
                .configure(events::configure)
                .configure(content::configure)
                .configure(admin::configure)
                .configure(api::configure),
        );
}
