use actix_web::web;

use crate::handlers::auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/me", web::get().to(auth::me))
            .route("/reload", web::post().to(auth::reload))
            .route("/send-verification", web::post().to(auth::send_verification))
            .route("/verify-email", web::post().to(auth::verify_email))
            .route("/profile", web::put().to(auth::update_profile)),
    );
}
