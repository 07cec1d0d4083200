use std::sync::{Arc, LazyLock};
use std::time::Duration as StdDuration;

use actix_web::{HttpRequest, http::StatusCode};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::database::{
    Database, StoreError,
    models::{
        AccountStatus, AuthResponse, Credential, LoginInput, ProfileInput, ProfilePatch,
        RegisterUserInput, UserAccessUpdate, UserProfile, UserRole,
    },
    repositories::{CredentialRepository, UserRepository, user::normalize_email},
    utils::new_document_id,
};
use crate::services::login_attempts::LoginAttempts;
use crate::services::mailer::{EmailMessage, MailError, Mailer};

const MIN_PASSWORD_LENGTH: usize = 6;
const VERIFICATION_TTL_HOURS: i64 = 24;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Failures of the sign-in provider. Each carries a stable code and renders
/// as the sentence shown to the user.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password.")]
    InvalidCredential,

    #[error("Too many failed login attempts. Please try again later.")]
    TooManyRequests,

    #[error("No account found with this email.")]
    UserNotFound,

    #[error("An account with this email already exists.")]
    EmailAlreadyInUse,

    #[error("This verification link is invalid or has expired.")]
    InvalidVerificationToken,

    #[error("Password should be at least 6 characters.")]
    WeakPassword,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please enter your name.")]
    MissingName,

    #[error("Please verify your email before continuing.")]
    EmailNotVerified,

    #[error("Your session has expired. Please sign in again.")]
    InvalidToken,

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Failed to issue token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Failed to send email: {0}")]
    Mail(#[from] MailError),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredential => "auth/invalid-credential",
            AuthError::TooManyRequests => "auth/too-many-requests",
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::InvalidVerificationToken => "auth/invalid-verification-token",
            AuthError::WeakPassword => "auth/weak-password",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::MissingName => "auth/missing-name",
            AuthError::EmailNotVerified => "auth/email-not-verified",
            AuthError::InvalidToken => "auth/invalid-token",
            AuthError::Store(_) | AuthError::Hash(_) | AuthError::Token(_) | AuthError::Mail(_) => {
                "auth/internal-error"
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredential | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailAlreadyInUse => StatusCode::CONFLICT,
            AuthError::InvalidVerificationToken
            | AuthError::WeakPassword
            | AuthError::InvalidEmail
            | AuthError::MissingName => StatusCode::BAD_REQUEST,
            AuthError::EmailNotVerified => StatusCode::FORBIDDEN,
            AuthError::Store(_) | AuthError::Hash(_) | AuthError::Token(_) | AuthError::Mail(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    credentials: CredentialRepository,
    attempts: LoginAttempts,
    mailer: Arc<dyn Mailer>,
    config: Config,
}

impl AuthService {
    pub fn new(config: Config, db: Database, mailer: Arc<dyn Mailer>) -> Self {
        let attempts = LoginAttempts::new(
            config.login_max_attempts,
            StdDuration::from_secs(config.login_lockout_seconds),
        );

        Self {
            users: UserRepository::new(db.clone()),
            credentials: CredentialRepository::new(db),
            attempts,
            mailer,
            config,
        }
    }

    pub async fn register(&self, request: RegisterUserInput) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyInUse);
        }

        let password_hash = hash(&request.password, self.config.bcrypt_cost)?;
        let uid = new_document_id();

        self.credentials
            .save_credential(&Credential {
                id: uid.clone(),
                email: email.clone(),
                password_hash,
            })
            .await?;
        let user = self
            .users
            .create_user(&UserProfile::new(uid, email, name.to_string()))
            .await?;

        log::info!("Registered user {} ({})", user.id, user.email);
        let token = self.generate_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(&request.email);
        if self.attempts.is_locked(&email).await {
            return Err(AuthError::TooManyRequests);
        }

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_ok = match self.credentials.find_credential(&user.id).await? {
            Some(credential) => verify(&request.password, &credential.password_hash)?,
            None => false,
        };

        if !password_ok {
            let failures = self.attempts.record_failure(&email).await;
            if failures >= self.config.login_max_attempts {
                return Err(AuthError::TooManyRequests);
            }
            return Err(AuthError::InvalidCredential);
        }

        self.attempts.clear(&email).await;
        let token = self.generate_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    pub async fn current_user(&self, user_id: &str) -> Result<UserProfile, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Re-read the profile and issue a token carrying its current claims.
    pub async fn reload(&self, user_id: &str) -> Result<AuthResponse, AuthError> {
        let user = self.current_user(user_id).await?;
        let token = self.generate_token(&user)?;
        Ok(AuthResponse { token, user })
    }

    /// Email a one-time verification link. Returns the token so development
    /// builds can surface it directly.
    pub async fn send_verification(&self, user: &UserProfile) -> Result<String, AuthError> {
        let token = format!("{}{}", new_document_id(), new_document_id());
        let expires_at = Utc::now() + Duration::hours(VERIFICATION_TTL_HOURS);
        self.credentials
            .create_verification(&token, &user.id, &user.email, expires_at)
            .await?;

        let link = format!(
            "{}/verify-email?token={}",
            self.config.client_base_url.trim_end_matches('/'),
            token
        );
        let message = EmailMessage {
            to: user.email.clone(),
            subject: "Verify your email".to_string(),
            text: Some(format!(
                "Hi {},\n\nConfirm your email address by opening this link:\n{}\n\nThe link expires in {} hours.",
                user.name, link, VERIFICATION_TTL_HOURS
            )),
            html: Some(format!(
                "<p>Hi {},</p><p><a href=\"{}\">Confirm your email address</a></p><p>The link expires in {} hours.</p>",
                html_escape(&user.name),
                html_escape(&link),
                VERIFICATION_TTL_HOURS
            )),
        };
        self.mailer.send(&message).await?;

        log::info!("Sent verification email to {}", user.email);
        Ok(token)
    }

    /// Consume a verification token; a pending account moves to onboarding.
    pub async fn verify_email(&self, token: &str) -> Result<UserProfile, AuthError> {
        let verification = self
            .credentials
            .take_verification(token.trim())
            .await?
            .filter(|v| v.expires_at > Utc::now())
            .ok_or(AuthError::InvalidVerificationToken)?;

        let user = self.current_user(&verification.user_id).await?;
        let update = UserAccessUpdate {
            email_verified: Some(true),
            status: (user.status == AccountStatus::Pending).then_some(AccountStatus::Onboarding),
            ..Default::default()
        };

        self.users
            .update_access(&user.id, &update)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Save profile fields; a verified onboarding account becomes active.
    pub async fn complete_profile(
        &self,
        user_id: &str,
        input: ProfileInput,
    ) -> Result<UserProfile, AuthError> {
        let user = self.current_user(user_id).await?;
        if !user.email_verified {
            return Err(AuthError::EmailNotVerified);
        }
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingName);
        }

        let patch = ProfilePatch {
            name: name.to_string(),
            phone: input.phone,
            roll_number: input.roll_number,
            department: input.department,
            year: input.year,
            avatar_url: input.avatar_url,
            status: (user.status == AccountStatus::Onboarding).then_some(AccountStatus::Active),
        };

        self.users
            .update_profile(user_id, &patch)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn generate_token(&self, user: &UserProfile) -> Result<String, AuthError> {
        let expiration = (Utc::now() + Duration::days(self.config.jwt_expiration_days)).timestamp();

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            email_verified: user.email_verified,
            exp: expiration as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mailer::LogMailer;

    fn service() -> AuthService {
        let config = Config::test_config();
        let mailer = Arc::new(LogMailer::new(config.mail_from.clone()));
        AuthService::new(config, Database::memory(), mailer)
    }

    fn signup(email: &str) -> RegisterUserInput {
        RegisterUserInput {
            email: email.to_string(),
            password: "hunter22".to_string(),
            name: "Asha Rao".to_string(),
        }
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn codes_map_to_fixed_sentences() {
        for (error, code, sentence) in [
            (
                AuthError::InvalidCredential,
                "auth/invalid-credential",
                "Invalid email or password.",
            ),
            (
                AuthError::TooManyRequests,
                "auth/too-many-requests",
                "Too many failed login attempts. Please try again later.",
            ),
            (
                AuthError::UserNotFound,
                "auth/user-not-found",
                "No account found with this email.",
            ),
            (
                AuthError::EmailAlreadyInUse,
                "auth/email-already-in-use",
                "An account with this email already exists.",
            ),
        ] {
            assert_eq!(error.code(), code);
            assert_eq!(error.to_string(), sentence);
        }
        assert_eq!(
            AuthError::Mail(MailError::MissingMessageId).code(),
            "auth/internal-error"
        );
    }

    #[test]
    fn html_escape_covers_markup() {
        assert_eq!(
            html_escape(r#"<b>Tom & "Jerry"</b>"#),
            "&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("asha@example.edu"));
        assert!(!is_valid_email("asha@"));
        assert!(!is_valid_email("not an email"));
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service();
        let registered = auth.register(signup("Asha@Example.edu")).await.unwrap();
        assert_eq!(registered.user.status, AccountStatus::Pending);
        assert_eq!(registered.user.role, UserRole::Member);

        let claims = auth.verify_token(&registered.token).unwrap();
        assert_eq!(claims.sub, registered.user.id);

        let logged_in = auth.login(login("asha@example.edu", "hunter22")).await.unwrap();
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let auth = service();
        auth.register(signup("asha@example.edu")).await.unwrap();
        let err = auth.register(signup("ASHA@example.edu")).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn repeated_failures_lock_the_account() {
        let auth = service();
        auth.register(signup("asha@example.edu")).await.unwrap();

        for _ in 0..2 {
            let err = auth.login(login("asha@example.edu", "wrong")).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredential));
        }
        let err = auth.login(login("asha@example.edu", "wrong")).await.unwrap_err();
        assert!(matches!(err, AuthError::TooManyRequests));

        let err = auth.login(login("asha@example.edu", "hunter22")).await.unwrap_err();
        assert!(matches!(err, AuthError::TooManyRequests));
    }

    #[tokio::test]
    async fn unknown_email_is_reported() {
        let err = service().login(login("ghost@example.edu", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verification_then_profile_activates() {
        let auth = service();
        let registered = auth.register(signup("asha@example.edu")).await.unwrap();

        let early = auth
            .complete_profile(
                &registered.user.id,
                ProfileInput {
                    name: "Asha".to_string(),
                    phone: None,
                    roll_number: None,
                    department: None,
                    year: None,
                    avatar_url: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(early, AuthError::EmailNotVerified));

        let token = auth.send_verification(&registered.user).await.unwrap();
        let verified = auth.verify_email(&token).await.unwrap();
        assert!(verified.email_verified);
        assert_eq!(verified.status, AccountStatus::Onboarding);

        let reused = auth.verify_email(&token).await.unwrap_err();
        assert!(matches!(reused, AuthError::InvalidVerificationToken));

        let active = auth
            .complete_profile(
                &registered.user.id,
                ProfileInput {
                    name: "Asha Rao".to_string(),
                    phone: Some("9876543210".to_string()),
                    roll_number: Some("21CS042".to_string()),
                    department: Some("CSE".to_string()),
                    year: Some("3".to_string()),
                    avatar_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(active.status, AccountStatus::Active);
        assert_eq!(active.roll_number.as_deref(), Some("21CS042"));
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let auth = service();
        assert!(matches!(
            auth.verify_token("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
