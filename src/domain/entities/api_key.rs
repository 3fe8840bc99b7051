use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on keys with `is_active = true` per project, enforced when a key is created.
pub const MAX_ACTIVE_KEYS_PER_PROJECT: usize = 3;

/// A project-scoped API key as embedded in the owning user's document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl ApiKey {
    /// Build a fresh active key. A negative validity yields a key that is already expired.
    pub fn issue(key: String, now: DateTime<Utc>, validity_days: i64) -> Self {
        Self {
            key,
            created_at: now,
            expires_at: now + Duration::days(validity_days),
            is_active: true,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Number of keys flagged active, regardless of expiry.
pub fn count_active(keys: &[ApiKey]) -> usize {
    keys.iter().filter(|k| k.is_active).count()
}
