use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::AppState;
use crate::database::models::{LoginInput, ProfileInput, RegisterUserInput, VerifyEmailInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::user_context::extract_context;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSent {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterUserInput>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.register(input.into_inner()).await?;
    Ok(ApiResponse::created(response))
}

pub async fn login(
    state: web::Data<AppState>,
    input: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.login(input.into_inner()).await?;
    Ok(ApiResponse::success(response))
}

pub async fn me(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    Ok(ApiResponse::success(ctx.user))
}

pub async fn reload(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    let response = state.auth_service.reload(ctx.user_id()).await?;
    Ok(ApiResponse::success(response))
}

pub async fn send_verification(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    if ctx.user.email_verified {
        return Ok(ApiResponse::success_message("Email is already verified."));
    }

    let token = state.auth_service.send_verification(&ctx.user).await?;

    // Outside production the token is returned so the flow works without a mailbox
    let token = (!state.config.is_production()).then_some(token);
    Ok(ApiResponse::success(VerificationSent {
        email: ctx.user.email,
        token,
    }))
}

pub async fn verify_email(
    state: web::Data<AppState>,
    input: web::Json<VerifyEmailInput>,
) -> Result<HttpResponse, AppError> {
    let user = state.auth_service.verify_email(&input.token).await?;
    log::info!("Verified email for user {}", user.id);
    Ok(ApiResponse::success(user))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    input: web::Json<ProfileInput>,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    let user = state
        .auth_service
        .complete_profile(ctx.user_id(), input.into_inner())
        .await?;
    Ok(ApiResponse::success(user))
}
