use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{CheckInApi, CheckInFailure, CheckInRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInBody<'a> {
    user_id: &'a str,
    code: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Submits check-ins to `POST {base_url}/api/events/{id}/check-in`.
#[derive(Clone, Debug)]
pub struct HttpCheckInApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpCheckInApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn endpoint(&self, event_id: &str) -> String {
        format!("{}/api/events/{}/check-in", self.base_url, event_id)
    }
}

#[async_trait]
impl CheckInApi for HttpCheckInApi {
    async fn submit(&self, request: &CheckInRequest) -> Result<(), CheckInFailure> {
        let mut call = self
            .client
            .post(self.endpoint(&request.event_id))
            .json(&CheckInBody {
                user_id: &request.user_id,
                code: &request.code,
            });
        if let Some(token) = &self.token {
            call = call.bearer_auth(token);
        }

        let response = call
            .send()
            .await
            .map_err(|e| CheckInFailure::new(format!("Network error: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .unwrap_or_else(|| format!("Check-in failed ({})", status.as_u16()));
        Err(CheckInFailure::new(message))
    }
}
