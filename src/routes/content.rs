use actix_web::web;

use crate::handlers::{messages, resources, settings, team_members};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/resources", web::get().to(resources::list_resources))
        .route("/team-members", web::get().to(team_members::list_team_members))
        .route(
            "/team-members/stream",
            web::get().to(team_members::stream_team_members),
        )
        .route("/messages", web::post().to(messages::submit_message))
        .route("/settings/{id}", web::get().to(settings::get_settings));
}
