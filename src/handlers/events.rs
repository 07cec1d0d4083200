use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Local;

use crate::AppState;
use crate::database::models::{
    AttendeeStatus, CheckInInput, Event, EventRegistration, EventView, FeedbackInput,
    RegisterInput, UserDetails,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::user_context::extract_context;

const MAX_RATING: u8 = 5;

pub(crate) async fn load_event(state: &AppState, event_id: &str) -> Result<Event, AppError> {
    state
        .events()
        .find_event(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))
}

fn team_size_message(event: &Event) -> String {
    if event.min_team_size == event.max_team_size {
        format!("Team size must be exactly {}", event.min_team_size)
    } else {
        format!(
            "Team size must be between {} and {}",
            event.min_team_size, event.max_team_size
        )
    }
}

/// Solo registrations may send no body at all; anything else must parse.
fn parse_register_body(body: &[u8]) -> Result<RegisterInput, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RegisterInput::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request(format!("Invalid request body: {}", err)))
}

pub async fn list_events(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let now = Local::now().naive_local();
    let events: Vec<EventView> = state
        .events()
        .list_events()
        .await
        .iter()
        .map(|event| event.public_view(now))
        .collect();
    Ok(ApiResponse::success(events))
}

pub async fn get_event(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let event = load_event(&state, &path).await?;
    Ok(ApiResponse::success(
        event.public_view(Local::now().naive_local()),
    ))
}

pub async fn register(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    ctx.requires_active()?;
    let input = parse_register_body(&body)?;

    let event = load_event(&state, &path).await?;
    if !event.registration_open_at(Local::now().naive_local()) {
        return Err(AppError::bad_request("Registration is closed for this event"));
    }

    let registration = EventRegistration {
        id: ctx.user_id().to_string(),
        event_id: event.id.clone(),
        user_id: ctx.user_id().to_string(),
        user_details: input
            .user_details
            .unwrap_or_else(|| UserDetails::from(&ctx.user)),
        status: AttendeeStatus::Registered,
        team_name: input
            .team_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
        team_members: input.team_members,
        checked_in_at: None,
        feedback_submitted: false,
        created_at: None,
        updated_at: None,
    };
    if !event.accepts_team_size(registration.team_size()) {
        return Err(AppError::bad_request(team_size_message(&event)));
    }

    let registrations = state.registrations();
    if let Some(existing) = registrations.find(&event.id, ctx.user_id()).await? {
        if existing.is_active() {
            return Err(AppError::bad_request("Already registered for this event"));
        }
    }

    let saved = registrations.save(&registration).await?;
    Ok(ApiResponse::created(saved))
}

pub async fn cancel_registration(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    let event = load_event(&state, &path).await?;

    let registrations = state.registrations();
    let registration = registrations
        .find(&event.id, ctx.user_id())
        .await?
        .ok_or_else(|| AppError::not_found("You are not registered for this event"))?;

    match registration.status {
        AttendeeStatus::Attended => Err(AppError::bad_request(
            "Attended registrations cannot be cancelled",
        )),
        AttendeeStatus::Cancelled => Ok(ApiResponse::success(registration)),
        AttendeeStatus::Registered => {
            let cancelled = registrations
                .cancel(&event.id, ctx.user_id())
                .await?
                .ok_or_else(|| AppError::not_found("You are not registered for this event"))?;
            log::info!(
                "User {} cancelled registration for event {}",
                ctx.user_id(),
                event.id
            );
            Ok(ApiResponse::success(cancelled))
        }
    }
}

/// The caller's registration for the event, or `null`.
pub async fn my_registration(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    let event = load_event(&state, &path).await?;
    let registration = state
        .registrations()
        .find(&event.id, ctx.user_id())
        .await?;
    Ok(ApiResponse::success(registration))
}

pub async fn check_in(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<CheckInInput>,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    let input = input.into_inner();
    let user_id = input.user_id.as_deref().unwrap_or(ctx.user_id()).to_string();
    if !ctx.can_act_for(&user_id) {
        return Err(AppError::forbidden("You can only check yourself in"));
    }

    let event = load_event(&state, &path).await?;
    if !event.check_in_active() {
        return Err(AppError::bad_request("Check-in is not active for this event"));
    }

    let code_matches = event
        .attendance_code
        .as_deref()
        .is_some_and(|expected| expected.trim().eq_ignore_ascii_case(input.code.trim()));
    if !code_matches {
        return Err(AppError::bad_request("Invalid code"));
    }

    let registrations = state.registrations();
    let registration = registrations
        .find(&event.id, &user_id)
        .await?
        .filter(EventRegistration::is_active)
        .ok_or_else(|| AppError::bad_request("You are not registered for this event"))?;
    if registration.status == AttendeeStatus::Attended {
        return Err(AppError::bad_request("Already checked in"));
    }

    let attended = registrations
        .mark_attended(&event.id, &user_id)
        .await?
        .ok_or_else(|| AppError::bad_request("You are not registered for this event"))?;
    log::info!("User {} checked in to event {}", user_id, event.id);
    Ok(ApiResponse::success(attended))
}

pub async fn submit_feedback(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    input: web::Json<FeedbackInput>,
) -> Result<HttpResponse, AppError> {
    let ctx = extract_context(&req).await?;
    let event = load_event(&state, &path).await?;
    if !event.feedback_active() {
        return Err(AppError::bad_request("Feedback is not open for this event"));
    }
    if !(1..=MAX_RATING).contains(&input.rating) {
        return Err(AppError::bad_request("Rating must be between 1 and 5"));
    }

    let attended = state
        .registrations()
        .find(&event.id, ctx.user_id())
        .await?
        .is_some_and(|r| r.status == AttendeeStatus::Attended);
    if !attended {
        return Err(AppError::bad_request(
            "Only checked-in attendees can leave feedback",
        ));
    }

    let feedback_repo = state.feedback();
    if feedback_repo.find(&event.id, ctx.user_id()).await?.is_some() {
        return Err(AppError::bad_request("Feedback already submitted"));
    }

    let feedback = feedback_repo
        .submit(&event.id, ctx.user_id(), &input)
        .await?;
    state
        .registrations()
        .mark_feedback_submitted(&event.id, ctx.user_id())
        .await?;
    Ok(ApiResponse::created(feedback))
}
