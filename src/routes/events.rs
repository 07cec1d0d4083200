use actix_web::web;

use crate::handlers::events;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(events::list_events))
            .route("/{id}", web::get().to(events::get_event))
            .route("/{id}/register", web::post().to(events::register))
            .route("/{id}/register", web::delete().to(events::cancel_registration))
            .route("/{id}/registration", web::get().to(events::my_registration))
            .route("/{id}/check-in", web::post().to(events::check_in))
            .route("/{id}/feedback", web::post().to(events::submit_feedback)),
    );
}
