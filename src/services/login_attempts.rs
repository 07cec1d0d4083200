use std::time::Duration;

use moka::future::Cache;

/// Failed sign-in counter per email. An email is locked once it reaches
/// `max_attempts` failures; the counter expires `lockout` after the last one.
#[derive(Clone)]
pub struct LoginAttempts {
    failures: Cache<String, u32>,
    max_attempts: u32,
}

impl LoginAttempts {
    pub fn new(max_attempts: u32, lockout: Duration) -> Self {
        let failures = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(lockout)
            .build();

        Self {
            failures,
            max_attempts,
        }
    }

    pub async fn is_locked(&self, email: &str) -> bool {
        self.failures
            .get(email)
            .await
            .is_some_and(|count| count >= self.max_attempts)
    }

    /// Increment atomically so concurrent failures are all counted.
    pub async fn record_failure(&self, email: &str) -> u32 {
        let count = self
            .failures
            .entry_by_ref(email)
            .and_upsert_with(|existing| {
                let count = existing.map_or(0, |entry| entry.into_value()) + 1;
                std::future::ready(count)
            })
            .await
            .into_value();
        if count >= self.max_attempts {
            log::warn!("Locking sign-in for {} after {} failures", email, count);
        }
        count
    }

    pub async fn clear(&self, email: &str) {
        self.failures.invalidate(email).await;
    }
}
