pub mod auth;
pub mod content;
pub mod event;
pub mod feedback;
pub(crate) mod macros;
pub mod registration;
pub mod stats;
pub mod user;

// Re-export all models for easy importing
pub use auth::*;
pub use content::*;
pub use event::*;
pub use feedback::*;
pub use registration::*;
pub use stats::*;
pub use user::*;
