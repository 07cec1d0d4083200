pub mod auth;
pub mod avatars;
pub mod login_attempts;
pub mod mailer;
pub mod seed;
pub mod user_context;

pub use auth::AuthService;
pub use mailer::{EmailMessage, Mailer};
pub use user_context::UserContext;
