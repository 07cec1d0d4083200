use chrono::NaiveDateTime;

use crate::database::{
    Database, Query, StoreError, collections,
    models::{AccountStatus, AttendeeStatus, DashboardStats, Event, UserRole},
};

/// Admin dashboard counters. Computed on request; nothing is cached.
#[derive(Clone)]
pub struct StatsRepository {
    db: Database,
}

impl StatsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn count(&self, collection: &str, query: Query) -> Result<usize, StoreError> {
        self.db.count(collection, &query).await
    }

    /// `open_events` uses the same window as the public `registrationOpen` flag.
    pub async fn dashboard_stats(&self, now: NaiveDateTime) -> Result<DashboardStats, StoreError> {
        let events: Vec<Event> = self.db.list(collections::EVENTS, &Query::new()).await?;

        let mut total_registrations = 0;
        let mut attended_registrations = 0;
        for event in &events {
            let collection = collections::registrations(&event.id);
            total_registrations += self.count(&collection, Query::new()).await?;
            attended_registrations += self
                .count(
                    &collection,
                    Query::new().filter("status", AttendeeStatus::Attended.as_str()),
                )
                .await?;
        }

        let by_status = |status: AccountStatus| Query::new().filter("status", status.as_str());

        Ok(DashboardStats {
            total_events: events.len(),
            open_events: events
                .iter()
                .filter(|e| e.registration_open_at(now))
                .count(),
            total_registrations,
            attended_registrations,
            total_users: self.count(collections::USERS, Query::new()).await?,
            pending_users: self
                .count(collections::USERS, by_status(AccountStatus::Pending))
                .await?,
            onboarding_users: self
                .count(collections::USERS, by_status(AccountStatus::Onboarding))
                .await?,
            active_users: self
                .count(collections::USERS, by_status(AccountStatus::Active))
                .await?,
            admins: self
                .count(
                    collections::USERS,
                    Query::new().filter("role", UserRole::Admin.as_str()),
                )
                .await?,
            total_messages: self.count(collections::MESSAGES, Query::new()).await?,
            unread_messages: self
                .count(collections::MESSAGES, Query::new().filter("read", false))
                .await?,
            total_resources: self.count(collections::RESOURCES, Query::new()).await?,
            total_team_members: self.count(collections::TEAM_MEMBERS, Query::new()).await?,
        })
    }
}
