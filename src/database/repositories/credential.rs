use chrono::{DateTime, Utc};

use crate::database::{
    Database, StoreError, collections,
    models::{Credential, EmailVerification},
};

/// Password hashes and email verification tokens. Nothing here is ever
/// returned from the API.
#[derive(Clone)]
pub struct CredentialRepository {
    db: Database,
}

impl CredentialRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn find_credential(&self, user_id: &str) -> Result<Option<Credential>, StoreError> {
        self.db.get(collections::CREDENTIALS, user_id).await
    }

    pub async fn save_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        let _: Credential = self
            .db
            .set(collections::CREDENTIALS, &credential.id, credential)
            .await?;
        Ok(())
    }

    pub async fn create_verification(
        &self,
        token: &str,
        user_id: &str,
        email: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<EmailVerification, StoreError> {
        let verification = EmailVerification {
            id: token.to_string(),
            user_id: user_id.to_string(),
            email: email.to_string(),
            expires_at,
        };
        self.db
            .set(collections::EMAIL_VERIFICATIONS, token, &verification)
            .await
    }

    /// Remove and return a verification token. Tokens are single use whether
    /// or not they turn out to be expired.
    pub async fn take_verification(
        &self,
        token: &str,
    ) -> Result<Option<EmailVerification>, StoreError> {
        let verification: Option<EmailVerification> =
            self.db.get(collections::EMAIL_VERIFICATIONS, token).await?;
        if verification.is_some() {
            self.db.delete(collections::EMAIL_VERIFICATIONS, token).await?;
        }
        Ok(verification)
    }
}
