use crate::database::{Database, Document, StoreError, collections};

/// Free-form settings documents, e.g. `site`.
#[derive(Clone)]
pub struct SettingsRepository {
    db: Database,
}

impl SettingsRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// An absent settings document reads as an empty object.
    pub async fn get_settings(&self, id: &str) -> Result<Document, StoreError> {
        let settings: Option<Document> = self.db.get(collections::SETTINGS, id).await?;
        Ok(settings.unwrap_or_default())
    }

    /// Merge `fields` into the settings document, creating it if needed.
    pub async fn update_settings(&self, id: &str, fields: &Document) -> Result<Document, StoreError> {
        match self.db.update(collections::SETTINGS, id, fields).await? {
            Some(updated) => Ok(updated),
            None => self.db.set(collections::SETTINGS, id, fields).await,
        }
    }
}
