use actix_web::web;

use crate::handlers::{admin, messages, resources, settings, team_members};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/dashboard", web::get().to(admin::dashboard))
            .route("/events", web::get().to(admin::list_events))
            .route("/events", web::post().to(admin::create_event))
            .route("/events/{id}", web::get().to(admin::get_event))
            .route("/events/{id}", web::put().to(admin::update_event))
            .route("/events/{id}", web::delete().to(admin::delete_event))
            .route(
                "/events/{id}/attendance-code",
                web::post().to(admin::regenerate_attendance_code),
            )
            .route(
                "/events/{id}/registrations",
                web::get().to(admin::list_registrations),
            )
            .route(
                "/events/{id}/registrations/export",
                web::get().to(admin::export_registrations),
            )
            .route("/events/{id}/feedback", web::get().to(admin::list_feedback))
            .route("/users", web::get().to(admin::list_users))
            .route("/users/{id}", web::get().to(admin::get_user))
            .route("/users/{id}/role", web::put().to(admin::update_user_role))
            .route("/users/{id}/status", web::put().to(admin::update_user_status))
            .route("/resources", web::post().to(resources::create_resource))
            .route("/resources/{id}", web::put().to(resources::update_resource))
            .route("/resources/{id}", web::delete().to(resources::delete_resource))
            .route(
                "/team-members",
                web::get().to(team_members::list_all_team_members),
            )
            .route(
                "/team-members",
                web::post().to(team_members::create_team_member),
            )
            .route(
                "/team-members/{id}",
                web::put().to(team_members::update_team_member),
            )
            .route(
                "/team-members/{id}",
                web::delete().to(team_members::delete_team_member),
            )
            .route("/messages", web::get().to(messages::list_messages))
            .route("/messages/stream", web::get().to(messages::stream_messages))
            .route("/messages/{id}/read", web::put().to(messages::mark_message_read))
            .route("/messages/{id}", web::delete().to(messages::delete_message))
            .route("/settings/{id}", web::put().to(settings::update_settings)),
    );
}
