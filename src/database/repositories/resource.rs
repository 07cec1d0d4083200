use crate::database::{
    Database, Query, StoreError, collections,
    models::{Resource, ResourceInput, ResourceUpdate},
};

use super::or_empty;

#[derive(Clone)]
pub struct ResourceRepository {
    db: Database,
}

impl ResourceRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list_resources(&self) -> Vec<Resource> {
        or_empty(
            collections::RESOURCES,
            self.db
                .list(collections::RESOURCES, &Query::newest_first())
                .await,
        )
    }

    /// Resources in one category, keeping the order of the full listing.
    pub async fn list_by_category(&self, category: &str) -> Vec<Resource> {
        filter_by_category(self.list_resources().await, category)
    }

    pub async fn create_resource(&self, input: &ResourceInput) -> Result<Resource, StoreError> {
        self.db.add(collections::RESOURCES, input).await
    }

    pub async fn update_resource(
        &self,
        id: &str,
        update: &ResourceUpdate,
    ) -> Result<Option<Resource>, StoreError> {
        self.db.update(collections::RESOURCES, id, update).await
    }

    pub async fn delete_resource(&self, id: &str) -> Result<bool, StoreError> {
        self.db.delete(collections::RESOURCES, id).await
    }
}

pub fn filter_by_category(resources: Vec<Resource>, category: &str) -> Vec<Resource> {
    resources
        .into_iter()
        .filter(|resource| resource.category == category)
        .collect()
}
