use crate::database::{
    Database, Direction, Query, StoreError, Subscription, collections,
    models::{TeamMember, TeamMemberInput, TeamMemberUpdate},
};

use super::or_empty;

#[derive(Clone)]
pub struct TeamMemberRepository {
    db: Database,
}

fn roster_query() -> Query {
    Query::new().order_by("order", Direction::Asc)
}

impl TeamMemberRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_team_members(&self) -> Vec<TeamMember> {
        or_empty(
            collections::TEAM_MEMBERS,
            self.db
                .list(collections::TEAM_MEMBERS, &Query::newest_first())
                .await,
        )
    }

    /// Public roster, by display order.
    pub async fn roster(&self) -> Vec<TeamMember> {
        or_empty(
            collections::TEAM_MEMBERS,
            self.db.list(collections::TEAM_MEMBERS, &roster_query()).await,
        )
    }

    pub async fn create_team_member(
        &self,
        input: &TeamMemberInput,
    ) -> Result<TeamMember, StoreError> {
        self.db.add(collections::TEAM_MEMBERS, input).await
    }

    pub async fn update_team_member(
        &self,
        id: &str,
        update: &TeamMemberUpdate,
    ) -> Result<Option<TeamMember>, StoreError> {
        self.db.update(collections::TEAM_MEMBERS, id, update).await
    }

    pub async fn delete_team_member(&self, id: &str) -> Result<bool, StoreError> {
        self.db.delete(collections::TEAM_MEMBERS, id).await
    }

    /// Calls `callback` with the full roster now and after every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(Vec<TeamMember>) + Send + 'static,
    {
        self.db
            .subscribe(collections::TEAM_MEMBERS, roster_query(), callback)
    }
}
