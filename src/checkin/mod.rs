//! Attendee side of event check-in: a small state machine that collects a
//! four character code and submits it to the check-in endpoint.

pub mod client;
pub mod flow;

pub use client::HttpCheckInApi;
pub use flow::{CheckInFlow, CheckInOutcome, CheckInState};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CODE_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub event_id: String,
    pub user_id: String,
    pub code: String,
}

/// Rejection or transport failure, already phrased for the attendee.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CheckInFailure {
    pub message: String,
}

impl CheckInFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CheckInApi: Send + Sync {
    async fn submit(&self, request: &CheckInRequest) -> Result<(), CheckInFailure>;
}
