use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::app_error::{AppError, AppResult};

/// In-memory rate limiter for testing.
/// Uses HashMap to track request counts per key.
pub struct InMemoryRateLimiter {
    counts: Mutex<HashMap<String, u64>>,
    max_per_ip: u64,
}

impl InMemoryRateLimiter {
    pub fn new(max_per_ip: u64) -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
            max_per_ip,
        }
    }

    /// Create a permissive rate limiter that never blocks (for most tests).
    pub fn permissive() -> Self {
        Self::new(u64::MAX)
    }
}

#[async_trait]
impl crate::infra::RateLimiterTrait for InMemoryRateLimiter {
    async fn check(&self, ip: &str) -> AppResult<()> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(format!("rate:ip:{ip}")).or_insert(0);
        *count += 1;
        if *count > self.max_per_ip {
            return Err(AppError::RateLimited);
        }
        Ok(())
    }
}
