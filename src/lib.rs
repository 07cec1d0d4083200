pub mod checkin;
pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod sitemap;

use std::sync::Arc;

pub use config::Config;
pub use database::Database;
pub use services::{AuthService, Mailer};

use database::repositories::{
    EventRepository, FeedbackRepository, MessageRepository, RegistrationRepository,
    ResourceRepository, SettingsRepository, StatsRepository, TeamMemberRepository, UserRepository,
};

/// Everything a handler needs, built once in `main` and shared through
/// `web::Data`.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub auth_service: AuthService,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: Config, db: Database, mailer: Arc<dyn Mailer>) -> Self {
        let auth_service = AuthService::new(config.clone(), db.clone(), Arc::clone(&mailer));
        Self {
            config,
            db,
            auth_service,
            mailer,
        }
    }

    pub fn events(&self) -> EventRepository {
        EventRepository::new(self.db.clone())
    }

    pub fn registrations(&self) -> RegistrationRepository {
        RegistrationRepository::new(self.db.clone())
    }

    pub fn feedback(&self) -> FeedbackRepository {
        FeedbackRepository::new(self.db.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }

    pub fn resources(&self) -> ResourceRepository {
        ResourceRepository::new(self.db.clone())
    }

    pub fn team_members(&self) -> TeamMemberRepository {
        TeamMemberRepository::new(self.db.clone())
    }

    pub fn messages(&self) -> MessageRepository {
        MessageRepository::new(self.db.clone())
    }

    pub fn settings(&self) -> SettingsRepository {
        SettingsRepository::new(self.db.clone())
    }

    pub fn stats(&self) -> StatsRepository {
        StatsRepository::new(self.db.clone())
    }
}
