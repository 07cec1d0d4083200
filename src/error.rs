use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::database::StoreError;
use crate::handlers::shared::ApiResponse;
use crate::services::{auth::AuthError, mailer::MailError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(StoreError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("{0}")]
    Auth(AuthError),

    #[error("Failed to send email: {0}")]
    Mail(MailError),

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Auth(err) => err.status_code(),
            AppError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!(
                "Request failed with status {}: {}",
                status_code,
                error_message
            );
        } else {
            log::warn!(
                "Request rejected with status {}: {}",
                status_code,
                error_message
            );
        }

        let body = match self {
            AppError::Auth(err) => ApiResponse::error_with_code(&error_message, err.code()),
            _ => ApiResponse::<()>::error(&error_message),
        };
        HttpResponse::build(status_code).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> Self {
        AppError::Auth(error)
    }
}

impl From<MailError> for AppError {
    fn from(error: MailError) -> Self {
        log::error!("Mail error: {}", error);
        AppError::Mail(error)
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn internal_server_error() -> Self {
        AppError::InternalServerError(None)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_render_their_bare_message() {
        let error = AppError::bad_request("Invalid code");
        assert_eq!(error.to_string(), "Invalid code");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_carry_the_raw_message() {
        let error = AppError::internal_server_error_message("relay exploded");
        assert_eq!(error.to_string(), "Internal server error: relay exploded");
        assert_eq!(
            AppError::internal_server_error().to_string(),
            "Internal server error"
        );
    }

    #[test]
    fn auth_errors_use_provider_status() {
        let error = AppError::from(AuthError::TooManyRequests);
        assert_eq!(error.status_code(), StatusCode::TOO_MANY_REQUESTS);
    }
}
