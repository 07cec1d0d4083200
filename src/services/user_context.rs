use actix_web::{HttpRequest, web::Data};

use crate::AppState;
use crate::database::models::UserProfile;
use crate::error::AppError;
use crate::services::auth::{Claims, bearer_token};

/// The signed-in user for one request. The profile is re-read from the store
/// every time, so role or status changes apply to the next request.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub claims: Claims,
    pub user: UserProfile,
}

impl UserContext {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    pub fn requires_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Admin access required"))
        }
    }

    pub fn requires_active(&self) -> Result<(), AppError> {
        if self.user.is_active() {
            Ok(())
        } else {
            Err(AppError::forbidden(
                "Complete your profile to activate your account",
            ))
        }
    }

    /// Users act for themselves; admins may act for anyone.
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.user_id() == user_id || self.is_admin()
    }
}

pub async fn extract_context(req: &HttpRequest) -> Result<UserContext, AppError> {
    let state = req.app_data::<Data<AppState>>().ok_or_else(|| {
        log::error!("AppState is not registered on the application");
        AppError::internal_server_error()
    })?;

    let token = bearer_token(req).ok_or(AppError::Unauthorized)?;
    let claims = state
        .auth_service
        .verify_token(token)
        .map_err(|_| AppError::Unauthorized)?;

    let user = state
        .users()
        .find_by_id(&claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(UserContext { claims, user })
}
