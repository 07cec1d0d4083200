use actix_web::{HttpRequest, HttpResponse, web};

use crate::AppState;
use crate::database::models::{TeamMemberInput, TeamMemberUpdate};
use crate::error::AppError;
use crate::handlers::{shared::ApiResponse, stream::snapshot_stream};
use crate::services::user_context::extract_context;

/// Public roster in display order.
pub async fn list_team_members(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(ApiResponse::success(state.team_members().roster().await))
}

pub async fn stream_team_members(state: web::Data<AppState>) -> HttpResponse {
    let repo = state.team_members();
    snapshot_stream(move |tx| {
        repo.subscribe(move |members| {
            let _ = tx.send(members);
        })
    })
}

pub async fn list_all_team_members(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;
    Ok(ApiResponse::success(
        state.team_members().list_team_members().await,
    ))
}

pub async fn create_team_member(
    state: web::Data<AppState>,
    req: HttpRequest,
    input: web::Json<TeamMemberInput>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    if input.name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }

    let member = state.team_members().create_team_member(&input).await?;
    Ok(ApiResponse::created(member))
}

pub async fn update_team_member(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<TeamMemberUpdate>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    let member = state
        .team_members()
        .update_team_member(&path, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Team member not found"))?;
    Ok(ApiResponse::success(member))
}

pub async fn delete_team_member(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    extract_context(&req).await?.requires_admin()?;

    if !state.team_members().delete_team_member(&path).await? {
        return Err(AppError::not_found("Team member not found"));
    }
    Ok(ApiResponse::success_message("Team member deleted"))
}
