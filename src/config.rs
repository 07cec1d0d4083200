use anyhow::Result;
use std::{env, str::FromStr};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub avatars_dir: String,
    pub mail_relay_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    pub login_max_attempts: u32,
    pub login_lockout_seconds: u64,
    pub bcrypt_cost: u32,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        Ok(Config {
            database_url: var_or("DATABASE_URL", "memory:"),
            jwt_secret: var_or(
                "JWT_SECRET",
                "your-super-secret-jwt-key-change-this-in-production-12345",
            ),
            jwt_expiration_days: parse_or("JWT_EXPIRATION_DAYS", 30),
            host: var_or("HOST", "127.0.0.1"),
            port: parse_or("PORT", 8080),
            environment: var_or("ENVIRONMENT", "development"),
            client_base_url: var_or("BASE_URL", "http://localhost:3000"),
            avatars_dir: var_or("AVATARS_DIR", "public/avatars"),
            mail_relay_url: optional("MAIL_RELAY_URL"),
            mail_api_key: optional("MAIL_API_KEY"),
            mail_from: var_or("MAIL_FROM", "noreply@localhost"),
            login_max_attempts: parse_or("LOGIN_MAX_ATTEMPTS", 5),
            login_lockout_seconds: parse_or("LOGIN_LOCKOUT_SECONDS", 900),
            bcrypt_cost: parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
        })
    }

    /// Deterministic configuration for tests: in-memory store, cheap hashing.
    pub fn test_config() -> Self {
        Config {
            database_url: "memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            avatars_dir: "public/avatars".to_string(),
            mail_relay_url: None,
            mail_api_key: None,
            mail_from: "noreply@test.local".to_string(),
            login_max_attempts: 3,
            login_lockout_seconds: 60,
            bcrypt_cost: 4,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
