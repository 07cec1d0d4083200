use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::database::models::{ContactMessageInput, MessageReadInput};
use crate::error::AppError;
use crate::handlers::{shared::ApiResponse, stream::snapshot_stream};
use crate::services::{auth::is_valid_email, user_context::extract_context};

/// Public contact form.
pub async fn submit_message(
    state: web::Data<AppState>,
    input: web::Json<ContactMessageInput>,
) -> Result<HttpResponse, AppError> {
    if input.name.trim().is_empty() || input.message.trim().is_empty() {
        return Err(AppError::bad_request("Name and message are required"));
    }
    if !is_valid_email(&input.email) {
        return Err(AppError::bad_request("Please enter a valid email address."));
    }

    let message = state.messages().create_message(&input).await?;
    log::info!("New contact message {} from {}", message.id, message.email);
    Ok(ApiResponse::created(message))
}

pub async fn list_messages(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;
    Ok(ApiResponse::success(state.messages().list_messages().await))
}

pub async fn stream_messages(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    let repo = state.messages();
    Ok(snapshot_stream(move |tx| {
        repo.subscribe(move |messages| {
            let _ = tx.send(messages);
        })
    }))
}

pub async fn mark_message_read(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<MessageReadInput>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    let message = state
        .messages()
        .set_read(&path, input.read)
        .await?
        .ok_or_else(|| AppError::not_found("Message not found"))?;
    Ok(ApiResponse::success(message))
}

pub async fn delete_message(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    if !state.messages().delete_message(&path).await? {
        return Err(AppError::not_found("Message not found"));
    }
    Ok(ApiResponse::success_message("Message deleted"))
}
