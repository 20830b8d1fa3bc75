use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{DedupStore, PROCESSED_MARKER};
use crate::errors::BotError;

/// Stand-in expiry for TTLs too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

fn expiry(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Process-local store.
///
/// Only suitable for tests and single-process local runs: separate Lambda
/// instances do not see each other's entries.
#[derive(Debug, Default)]
pub struct MemoryDedupStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryDedupStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unexpired entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, expires_at)| *expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DedupStore for MemoryDedupStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BotError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > now => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BotError> {
        let expires_at = expiry(Instant::now(), ttl);
        self.entries
            .lock()
            .await
            .insert(key.to_string(), (value.to_string(), expires_at));
        Ok(())
    }

    async fn claim(&self, key: &str, ttl: Duration) -> Result<bool, BotError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        if entries
            .get(key)
            .is_some_and(|(_, expires_at)| *expires_at > now)
        {
            return Ok(false);
        }
        entries.insert(key.to_string(), (PROCESSED_MARKER.to_string(), expiry(now, ttl)));
        Ok(true)
    }
}
