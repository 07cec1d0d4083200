use actix_web::web;

use crate::handlers::api;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/avatars", web::get().to(api::avatars))
        .route("/seed", web::get().to(api::seed))
        .route("/send-email", web::post().to(api::send_email));
}
