use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    // 200 with data
    pub fn success(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::with_data(data))
    }

    // 201 with the created record
    pub fn created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::with_data(data))
    }

    fn with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            code: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn success_message(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self {
            success: true,
            data: None,
            message: Some(message.to_string()),
            error: None,
            code: None,
        })
    }

    // Error body (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(message.to_string()),
            code: None,
        }
    }

    /// Error body that also names a machine-readable code, e.g. `auth/user-not-found`.
    pub fn error_with_code(message: &str, code: &str) -> Self {
        Self {
            code: Some(code.to_string()),
            ..Self::error(message)
        }
    }
}
