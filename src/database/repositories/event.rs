use rand::Rng;

use crate::checkin::CODE_LENGTH;
use crate::database::{
    Database, Direction, Query, StoreError, collections,
    models::{Event, EventInput, EventUpdate},
};

use super::or_empty;

pub const ATTENDANCE_CODE_LENGTH: usize = CODE_LENGTH;

/// Random numeric check-in code, zero padded.
pub fn generate_attendance_code() -> String {
    let code = rand::rng().random_range(0..10u32.pow(ATTENDANCE_CODE_LENGTH as u32));
    format!("{:0width$}", code, width = ATTENDANCE_CODE_LENGTH)
}

#[derive(Clone)]
pub struct EventRepository {
    db: Database,
}

impl EventRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All events, latest date first.
    pub async fn list_events(&self) -> Vec<Event> {
        let query = Query::new().order_by("date", Direction::Desc);
        or_empty(
            collections::EVENTS,
            self.db.list(collections::EVENTS, &query).await,
        )
    }

    pub async fn find_event(&self, id: &str) -> Result<Option<Event>, StoreError> {
        self.db.get(collections::EVENTS, id).await
    }

    pub async fn create_event(&self, input: EventInput) -> Result<Event, StoreError> {
        let min_team_size = input.min_team_size.unwrap_or(1);
        let event = Event {
            id: String::new(),
            title: input.title,
            description: input.description,
            date: input.date,
            time: input.time,
            venue: input.venue,
            image_url: input.image_url,
            registration_status: input.registration_status.unwrap_or_default(),
            attendance_code: Some(
                input
                    .attendance_code
                    .filter(|code| !code.trim().is_empty())
                    .unwrap_or_else(generate_attendance_code),
            ),
            attendance_status: input.attendance_status.unwrap_or_default(),
            feedback_status: input.feedback_status.unwrap_or_default(),
            min_team_size,
            max_team_size: input.max_team_size.unwrap_or(min_team_size),
            created_at: None,
            updated_at: None,
        };

        let created: Event = self.db.add(collections::EVENTS, &event).await?;
        log::info!("Created event {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn update_event(
        &self,
        id: &str,
        update: &EventUpdate,
    ) -> Result<Option<Event>, StoreError> {
        self.db.update(collections::EVENTS, id, update).await
    }

    pub async fn delete_event(&self, id: &str) -> Result<bool, StoreError> {
        self.db.delete(collections::EVENTS, id).await
    }

    pub async fn regenerate_attendance_code(&self, id: &str) -> Result<Option<Event>, StoreError> {
        let update = EventUpdate {
            attendance_code: Some(generate_attendance_code()),
            ..Default::default()
        };
        self.update_event(id, &update).await
    }
}
