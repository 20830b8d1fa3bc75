//! Delivery-id deduplication.
//!
//! Slack retries an event delivery when the endpoint does not answer within
//! three seconds. Each delivery carries an `event_ts`; the store remembers
//! the ones already handled for a bounded TTL so a retry does not produce a
//! second reply. The store must be shared by every concurrent invocation.

pub mod dynamo;
pub mod memory;

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::BotError;

pub use dynamo::DynamoDedupStore;
pub use memory::MemoryDedupStore;

/// Value written under a claimed key.
pub const PROCESSED_MARKER: &str = "true";

/// Key-presence store with per-key expiry.
#[async_trait]
pub trait DedupStore: Send + Sync {
    /// Returns the live value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, BotError>;

    /// Stores `value` under `key` for `ttl`, overwriting any previous value.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BotError>;

    /// Marks `key` as processed and reports whether this caller was first.
    ///
    /// The default is a plain read followed by a write; backends that can do
    /// a conditional write override it to close the gap between the two.
    async fn claim(&self, key: &str, ttl: Duration) -> Result<bool, BotError> {
        if self.get(key).await?.is_some() {
            return Ok(false);
        }
        self.put(key, PROCESSED_MARKER, ttl).await?;
        Ok(true)
    }
}
