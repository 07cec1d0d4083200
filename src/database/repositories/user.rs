use crate::database::{
    Database, Query, StoreError, collections,
    models::{ProfilePatch, UserAccessUpdate, UserProfile},
};

use super::or_empty;

#[derive(Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_users(&self) -> Vec<UserProfile> {
        or_empty(
            collections::USERS,
            self.db.list(collections::USERS, &Query::newest_first()).await,
        )
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<UserProfile>, StoreError> {
        self.db.get(collections::USERS, id).await
    }

    /// Emails are stored lowercased, so lookups are case-insensitive.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        let query = Query::new()
            .filter("email", normalize_email(email))
            .limit(1);
        let users: Vec<UserProfile> = self.db.list(collections::USERS, &query).await?;
        Ok(users.into_iter().next())
    }

    pub async fn create_user(&self, profile: &UserProfile) -> Result<UserProfile, StoreError> {
        let mut profile = profile.clone();
        profile.email = normalize_email(&profile.email);
        let id = profile.id.clone();
        self.db.set(collections::USERS, &id, &profile).await
    }

    pub async fn update_access(
        &self,
        id: &str,
        update: &UserAccessUpdate,
    ) -> Result<Option<UserProfile>, StoreError> {
        self.db.update(collections::USERS, id, update).await
    }

    pub(crate) async fn update_profile(
        &self,
        id: &str,
        patch: &ProfilePatch,
    ) -> Result<Option<UserProfile>, StoreError> {
        self.db.update(collections::USERS, id, patch).await
    }

    pub async fn count_users(&self, query: &Query) -> Result<usize, StoreError> {
        self.db.count(collections::USERS, query).await
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
