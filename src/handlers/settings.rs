use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::database::Document;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::user_context::extract_context;

pub async fn get_settings(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let settings = state.settings().get_settings(&path).await?;
    Ok(ApiResponse::success(settings))
}

pub async fn update_settings(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<Document>,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    ctx.requires_admin()?;

    let settings = state.settings().update_settings(&path, &input).await?;
    log::info!("Settings {} updated by {}", path, ctx.user_id());
    Ok(ApiResponse::success(settings))
}
