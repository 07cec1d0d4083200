use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::AppState;
use crate::database::models::{ResourceInput, ResourceUpdate};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::user_context::extract_context;

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub category: Option<String>,
}

pub async fn list_resources(
    state: web::Data<AppState>,
    query: web::Query<ResourceQuery>,
) -> Result<HttpResponse, AppError> {
    let resources = match query.category.as_deref().filter(|c| !c.is_empty()) {
        Some(category) => state.resources().list_by_category(category).await,
        None => state.resources().list_resources().await,
    };
    Ok(ApiResponse::success(resources))
}

pub async fn create_resource(
    state: web::Data<AppState>,
    req: HttpRequest,
    input: web::Json<ResourceInput>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    if input.title.trim().is_empty() || input.url.trim().is_empty() {
        return Err(AppError::bad_request("Title and URL are required"));
    }

    let resource = state.resources().create_resource(&input).await?;
    Ok(ApiResponse::created(resource))
}

pub async fn update_resource(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<ResourceUpdate>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    let resource = state
        .resources()
        .update_resource(&path, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Resource not found"))?;
    Ok(ApiResponse::success(resource))
}

pub async fn delete_resource(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    if !state.resources().delete_resource(&path).await? {
        return Err(AppError::not_found("Resource not found"));
    }
    Ok(ApiResponse::success_message("Resource deleted"))
}
