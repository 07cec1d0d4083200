use actix_web::{HttpRequest, HttpResponse, http::header, web};
use chrono::Local;

use crate::AppState;
use crate::checkin::CODE_LENGTH;
use crate::database::models::{
    EventInput, EventUpdate, RoleInput, StatusInput, UserAccessUpdate,
};
use crate::error::AppError;
use crate::export::{registration_rows, to_csv};
use crate::handlers::{events::load_event, shared::ApiResponse};
use crate::services::user_context::{UserContext, extract_context};

async fn admin_context(req: &HttpRequest) -> Result<UserContext, AppError> {
    let ctx = extract_context(req).await?;
    ctx.requires_admin()?;
    Ok(ctx)
}

fn validate_team_sizes(min: Option<u32>, max: Option<u32>) -> Result<(), AppError> {
    let min = min.unwrap_or(1);
    let max = max.unwrap_or(min);
    if min == 0 || max < min {
        return Err(AppError::bad_request(
            "Team sizes must be at least 1 and min must not exceed max",
        ));
    }
    Ok(())
}

/// Codes must be enterable through the check-in flow, which only accepts
/// `CODE_LENGTH` ASCII letters and digits. Returns the trimmed code.
fn validate_attendance_code(code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(format!(
            "Attendance code must be {} letters or digits",
            CODE_LENGTH
        )));
    }
    Ok(code.to_string())
}

// Events, including attendance codes

pub async fn list_events(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;
    Ok(ApiResponse::success(state.events().list_events().await))
}

pub async fn get_event(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;
    Ok(ApiResponse::success(load_event(&state, &path).await?))
}

pub async fn create_event(
    state: web::Data<AppState>,
    req: HttpRequest,
    input: web::Json<EventInput>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let mut input = input.into_inner();
    if input.title.trim().is_empty() {
        return Err(AppError::bad_request("Title is required"));
    }
    validate_team_sizes(input.min_team_size, input.max_team_size)?;
    // blank means "generate one"
    input.attendance_code = match input.attendance_code.take() {
        Some(code) if !code.trim().is_empty() => Some(validate_attendance_code(&code)?),
        _ => None,
    };

    let event = state.events().create_event(input).await?;
    Ok(ApiResponse::created(event))
}

pub async fn update_event(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<EventUpdate>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let mut input = input.into_inner();
    let current = load_event(&state, &path).await?;
    validate_team_sizes(
        Some(input.min_team_size.unwrap_or(current.min_team_size)),
        Some(input.max_team_size.unwrap_or(current.max_team_size)),
    )?;
    if let Some(code) = input.attendance_code.take() {
        input.attendance_code = Some(validate_attendance_code(&code)?);
    }

    let event = state
        .events()
        .update_event(&current.id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;
    Ok(ApiResponse::success(event))
}

pub async fn delete_event(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = admin_context(&req).await?;

    if !state.events().delete_event(&path).await? {
        return Err(AppError::not_found("Event not found"));
    }
    log::info!("Event {} deleted by {}", path, ctx.user_id());
    Ok(ApiResponse::success_message("Event deleted"))
}

pub async fn regenerate_attendance_code(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let event = state
        .events()
        .regenerate_attendance_code(&path)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;
    Ok(ApiResponse::success(event))
}

// Registrations and feedback

pub async fn list_registrations(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let event = load_event(&state, &path).await?;
    Ok(ApiResponse::success(
        state.registrations().list_for_event(&event.id).await,
    ))
}

pub async fn export_registrations(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let event = load_event(&state, &path).await?;
    let registrations = state.registrations().list_for_event(&event.id).await;
    let csv = to_csv(&registration_rows(&registrations));

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"registrations-{}.csv\"",
                event.id
            ),
        ))
        .body(csv))
}

pub async fn list_feedback(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let event = load_event(&state, &path).await?;
    Ok(ApiResponse::success(
        state.feedback().list_for_event(&event.id).await,
    ))
}

// Users

pub async fn list_users(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;
    Ok(ApiResponse::success(state.users().list_users().await))
}

pub async fn get_user(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;

    let user = state
        .users()
        .find_by_id(&path)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(ApiResponse::success(user))
}

async fn update_access(
    state: &AppState,
    ctx: &UserContext,
    user_id: &str,
    update: UserAccessUpdate,
) -> Result<HttpResponse, AppError> {
    if ctx.user_id() == user_id {
        return Err(AppError::forbidden("You cannot change your own access"));
    }

    let user = state
        .users()
        .update_access(user_id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    log::info!(
        "User {} access changed by {} (role {}, status {})",
        user.id,
        ctx.user_id(),
        user.role,
        user.status
    );
    Ok(ApiResponse::success(user))
}

pub async fn update_user_role(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<RoleInput>,
) -> Result<HttpResponse, AppError> {
    let ctx = admin_context(&req).await?;
    let update = UserAccessUpdate {
        role: Some(input.role),
        ..Default::default()
    };
    update_access(&state, &ctx, &path, update).await
}

pub async fn update_user_status(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<StatusInput>,
) -> Result<HttpResponse, AppError> {
    let ctx = admin_context(&req).await?;
    let update = UserAccessUpdate {
        status: Some(input.status),
        ..Default::default()
    };
    update_access(&state, &ctx, &path, update).await
}

pub async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    admin_context(&req).await?;
    let stats = state
        .stats()
        .dashboard_stats(Local::now().naive_local())
        .await?;
    Ok(ApiResponse::success(stats))
}
