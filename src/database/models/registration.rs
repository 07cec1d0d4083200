use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::user::UserProfile;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum AttendeeStatus {
        #[default]
        Registered => "registered",
        Cancelled => "cancelled",
        Attended => "attended",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub roll_number: Option<String>,
    pub department: Option<String>,
    pub year: Option<String>,
}

impl From<&UserProfile> for UserDetails {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            roll_number: profile.roll_number.clone(),
            department: profile.department.clone(),
            year: profile.year.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teammate {
    pub name: String,
    pub email: Option<String>,
    pub roll_number: Option<String>,
}

/// One user's registration for one event, keyed by the user's id inside the
/// event's `registrations` subcollection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistration {
    #[serde(default)]
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_details: UserDetails,
    #[serde(default)]
    pub status: AttendeeStatus,
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_members: Vec<Teammate>,
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feedback_submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventRegistration {
    pub fn team_size(&self) -> u32 {
        1 + self.team_members.len() as u32
    }

    pub fn is_active(&self) -> bool {
        self.status != AttendeeStatus::Cancelled
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub user_details: Option<UserDetails>,
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_members: Vec<Teammate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInInput {
    pub user_id: Option<String>,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CheckInPatch {
    pub status: AttendeeStatus,
    pub checked_in_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusPatch {
    pub status: AttendeeStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedbackSubmittedPatch {
    pub feedback_submitted: bool,
}
