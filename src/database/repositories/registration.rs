use chrono::Utc;

use crate::database::{
    CREATED_AT_FIELD, Database, Direction, Query, StoreError, collections,
    models::{
        AttendeeStatus, CheckInPatch, EventRegistration, FeedbackSubmittedPatch, StatusPatch,
    },
};

use super::or_empty;

/// Registrations live under `events/{eventId}/registrations`, one document per
/// user keyed by the user's id.
#[derive(Clone)]
pub struct RegistrationRepository {
    db: Database,
}

impl RegistrationRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Registrations for one event in sign-up order.
    pub async fn list_for_event(&self, event_id: &str) -> Vec<EventRegistration> {
        let collection = collections::registrations(event_id);
        let query = Query::new().order_by(CREATED_AT_FIELD, Direction::Asc);
        or_empty(&collection, self.db.list(&collection, &query).await)
    }

    pub async fn find(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<EventRegistration>, StoreError> {
        self.db
            .get(&collections::registrations(event_id), user_id)
            .await
    }

    /// Create or replace the user's registration for the event.
    pub async fn save(
        &self,
        registration: &EventRegistration,
    ) -> Result<EventRegistration, StoreError> {
        let saved: EventRegistration = self
            .db
            .set(
                &collections::registrations(&registration.event_id),
                &registration.user_id,
                registration,
            )
            .await?;
        log::info!(
            "User {} registered for event {}",
            saved.user_id,
            saved.event_id
        );
        Ok(saved)
    }

    pub async fn cancel(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<EventRegistration>, StoreError> {
        let patch = StatusPatch {
            status: AttendeeStatus::Cancelled,
        };
        self.db
            .update(&collections::registrations(event_id), user_id, &patch)
            .await
    }

    pub async fn mark_attended(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<EventRegistration>, StoreError> {
        let patch = CheckInPatch {
            status: AttendeeStatus::Attended,
            checked_in_at: Utc::now(),
        };
        self.db
            .update(&collections::registrations(event_id), user_id, &patch)
            .await
    }

    pub async fn mark_feedback_submitted(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<EventRegistration>, StoreError> {
        let patch = FeedbackSubmittedPatch {
            feedback_submitted: true,
        };
        self.db
            .update(&collections::registrations(event_id), user_id, &patch)
            .await
    }

    pub async fn count_for_event(
        &self,
        event_id: &str,
        status: Option<AttendeeStatus>,
    ) -> Result<usize, StoreError> {
        let query = match status {
            Some(status) => Query::new().filter("status", status.as_str()),
            None => Query::new(),
        };
        self.db
            .count(&collections::registrations(event_id), &query)
            .await
    }
}
