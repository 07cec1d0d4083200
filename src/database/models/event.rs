use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use crate::lifecycle;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum RegistrationStatus {
        #[default]
        Upcoming => "upcoming",
        Open => "open",
        Closed => "closed",
    }
}

string_enum! {
    /// Attendance and feedback phases of an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum PhaseStatus {
        #[default]
        Upcoming => "upcoming",
        Active => "active",
        Ended => "ended",
    }
}

fn default_team_size() -> u32 {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Calendar date, `YYYY-MM-DD`, local to the club.
    #[serde(default)]
    pub date: String,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub registration_status: RegistrationStatus,
    pub attendance_code: Option<String>,
    #[serde(default)]
    pub attendance_status: PhaseStatus,
    #[serde(default)]
    pub feedback_status: PhaseStatus,
    #[serde(default = "default_team_size")]
    pub min_team_size: u32,
    #[serde(default = "default_team_size")]
    pub max_team_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Stored status says open and the calendar has not closed it yet.
    pub fn registration_open_at(&self, now: NaiveDateTime) -> bool {
        self.registration_status == RegistrationStatus::Open
            && lifecycle::is_registration_window_open_at(Some(&self.date), now)
    }

    pub fn check_in_active(&self) -> bool {
        self.attendance_status == PhaseStatus::Active
    }

    pub fn feedback_active(&self) -> bool {
        self.feedback_status == PhaseStatus::Active
    }

    pub fn accepts_team_size(&self, size: u32) -> bool {
        size >= self.min_team_size && size <= self.max_team_size
    }

    pub fn public_view(&self, now: NaiveDateTime) -> EventView {
        EventView {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            venue: self.venue.clone(),
            image_url: self.image_url.clone(),
            registration_status: self.registration_status,
            registration_open: self.registration_open_at(now),
            attendance_status: self.attendance_status,
            feedback_status: self.feedback_status,
            min_team_size: self.min_team_size,
            max_team_size: self.max_team_size,
            created_at: self.created_at,
        }
    }
}

/// What non-admins see of an event: no attendance code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub registration_status: RegistrationStatus,
    pub registration_open: bool,
    pub attendance_status: PhaseStatus,
    pub feedback_status: PhaseStatus,
    pub min_team_size: u32,
    pub max_team_size: u32,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    pub time: Option<String>,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub registration_status: Option<RegistrationStatus>,
    pub attendance_code: Option<String>,
    pub attendance_status: Option<PhaseStatus>,
    pub feedback_status: Option<PhaseStatus>,
    pub min_team_size: Option<u32>,
    pub max_team_size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_status: Option<RegistrationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_status: Option<PhaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback_status: Option<PhaseStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_team_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_team_size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn event(status: &str) -> Event {
        serde_json::from_value(json!({
            "id": "e1",
            "title": "Hack Night",
            "date": "2025-10-10",
            "registrationStatus": status,
            "attendanceCode": "4821"
        }))
        .unwrap()
    }

    #[test]
    fn missing_fields_take_defaults() {
        let event = event("open");
        assert_eq!(event.attendance_status, PhaseStatus::Upcoming);
        assert_eq!(event.min_team_size, 1);
        assert_eq!(event.max_team_size, 1);
        assert!(event.accepts_team_size(1));
        assert!(!event.accepts_team_size(2));
    }

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(event("OPEN").registration_status, RegistrationStatus::Open);
        assert!(serde_json::from_value::<Event>(json!({"title": "x", "registrationStatus": "maybe"})).is_err());
    }

    #[test]
    fn registration_needs_open_status_and_open_window() {
        let before = at(2025, 10, 9, 23, 59, 59);
        let on_the_day = at(2025, 10, 10, 0, 0, 0);

        assert!(event("open").registration_open_at(before));
        assert!(!event("open").registration_open_at(on_the_day));
        assert!(!event("closed").registration_open_at(before));
        assert!(!event("upcoming").registration_open_at(before));
    }

    #[test]
    fn public_view_hides_attendance_code() {
        let view = event("open").public_view(at(2025, 10, 1, 12, 0, 0));
        let value = serde_json::to_value(&view).unwrap();
        assert!(value.get("attendanceCode").is_none());
        assert_eq!(value["registrationOpen"], json!(true));
    }
}
