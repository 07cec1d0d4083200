use std::path::Path;

use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::AppState;
use crate::error::AppError;
use crate::middleware::RequestIdExt;
use crate::services::{avatars::list_avatars, mailer::EmailMessage, seed::seed_users};

#[derive(Debug, Default, Deserialize)]
pub struct SendEmailInput {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl SendEmailInput {
    fn into_message(self) -> Option<EmailMessage> {
        let to = present(self.to)?;
        let subject = present(self.subject)?;
        let text = present(self.text);
        let html = present(self.html);
        if text.is_none() && html.is_none() {
            return None;
        }
        Some(EmailMessage {
            to,
            subject,
            text,
            html,
        })
    }
}

/// Avatar image URLs grouped by category directory.
pub async fn avatars(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let avatars = list_avatars(Path::new(&state.config.avatars_dir))
        .await
        .map_err(|e| {
            log::error!("Failed to list avatars in {}: {}", state.config.avatars_dir, e);
            AppError::internal_server_error_message(e.to_string())
        })?;
    Ok(HttpResponse::Ok().json(avatars))
}

pub async fn seed(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    if state.config.is_production() {
        return Err(AppError::forbidden("Seeding is disabled in production"));
    }

    let count = seed_users(&state.db).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "count": count })))
}

pub async fn send_email(
    state: web::Data<AppState>,
    req: HttpRequest,
    input: web::Json<SendEmailInput>,
) -> Result<HttpResponse, AppError> {
    let message = input.into_inner().into_message().ok_or_else(|| {
        AppError::bad_request("Missing required fields: to, subject, and text or html")
    })?;

    match state.mailer.send(&message).await {
        Ok(message_id) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "messageId": message_id,
        }))),
        Err(e) => {
            log::error!(
                "Failed to send email to {} (request {}): {}",
                message.to,
                req.correlation_id().unwrap_or_default(),
                e
            );
            Ok(HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string(),
            })))
        }
    }
}
