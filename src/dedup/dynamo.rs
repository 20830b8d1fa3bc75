use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use std::time::Duration;
use tracing::debug;

use super::{DedupStore, PROCESSED_MARKER};
use crate::errors::BotError;

const KEY_ATTR: &str = "event_key";
const VALUE_ATTR: &str = "value";
const EXPIRES_ATTR: &str = "expires_at";

/// DynamoDB-backed store shared by all Lambda instances.
///
/// The table needs a string partition key `event_key` and should have TTL
/// enabled on the numeric `expires_at` attribute. TTL deletion is lazy, so
/// reads also compare `expires_at` against the current time.
pub struct DynamoDedupStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoDedupStore {
    #[must_use]
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// Build a store from the ambient AWS configuration.
    pub async fn from_env(table_name: String) -> Self {
        let shared_config = aws_config::from_env().load().await;
        Self::new(DynamoClient::new(&shared_config), table_name)
    }
}

fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

fn expiry_epoch_secs(ttl: Duration) -> i64 {
    now_epoch_secs().saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
}

/// An item without a readable `expires_at` never expires.
fn is_live(expires_at: Option<&AttributeValue>, now: i64) -> bool {
    expires_at
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .is_none_or(|exp| exp > now)
}

#[async_trait]
impl DedupStore for DynamoDedupStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BotError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTR, AttributeValue::S(key.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| BotError::AwsError(format!("dynamodb get_item: {e}")))?;

        let Some(item) = output.item else {
            return Ok(None);
        };

        if !is_live(item.get(EXPIRES_ATTR), now_epoch_secs()) {
            debug!(key = %key, "Ignoring expired dedup entry");
            return Ok(None);
        }

        Ok(Some(
            item.get(VALUE_ATTR)
                .and_then(|v| v.as_s().ok())
                .cloned()
                .unwrap_or_else(|| PROCESSED_MARKER.to_string()),
        ))
    }

    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BotError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(KEY_ATTR, AttributeValue::S(key.to_string()))
            .item(VALUE_ATTR, AttributeValue::S(value.to_string()))
            .item(EXPIRES_ATTR, AttributeValue::N(expiry_epoch_secs(ttl).to_string()))
            .send()
            .await
            .map_err(|e| BotError::AwsError(format!("dynamodb put_item: {e}")))?;
        Ok(())
    }

    async fn claim(&self, key: &str, ttl: Duration) -> Result<bool, BotError> {
        let now = now_epoch_secs();
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item(KEY_ATTR, AttributeValue::S(key.to_string()))
            .item(VALUE_ATTR, AttributeValue::S(PROCESSED_MARKER.to_string()))
            .item(EXPIRES_ATTR, AttributeValue::N(expiry_epoch_secs(ttl).to_string()))
            .condition_expression(format!(
                "attribute_not_exists({KEY_ATTR}) OR {EXPIRES_ATTR} <= :now"
            ))
            .expression_attribute_values(":now", AttributeValue::N(now.to_string()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(BotError::AwsError(format!("dynamodb conditional put_item: {e}"))),
        }
    }
}
