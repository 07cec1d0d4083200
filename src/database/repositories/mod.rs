pub mod credential;
pub mod event;
pub mod feedback;
pub mod message;
pub mod registration;
pub mod resource;
pub mod settings;
pub mod stats;
pub mod team_member;
pub mod user;

// Re-export all repositories for easy importing
pub use credential::CredentialRepository;
pub use event::EventRepository;
pub use feedback::FeedbackRepository;
pub use message::MessageRepository;
pub use registration::RegistrationRepository;
pub use resource::ResourceRepository;
pub use settings::SettingsRepository;
pub use stats::StatsRepository;
pub use team_member::TeamMemberRepository;
pub use user::UserRepository;

use super::StoreError;

/// List reads never fail the caller: a broken read is logged and shows up as
/// an empty list.
pub(crate) fn or_empty<T>(collection: &str, result: Result<Vec<T>, StoreError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::error!("Failed to read {}: {}", collection, e);
        Vec::new()
    })
}
