//! Slack API client module
//!
//! Encapsulates the two Web API calls the bot makes: looking up the reacted
//! message and posting the threaded reply.

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use slack_morphism::{SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackTs};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::models::{ChatMessage, HistoryRequest, ThreadReplyRequest};
use crate::errors::BotError;

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    ok: bool,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    error: Option<String>,
}

/// Slack API client
pub struct SlackClient {
    http: Client,
    token: SlackApiToken,
    base_url: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String, base_url: String) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
            base_url,
        }
    }

    #[must_use]
    pub fn token(&self) -> &SlackApiToken {
        &self.token
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, method: &str, body: &B) -> Result<Value, BotError> {
        let request = self.http.post(self.method_url(method)).json(body);
        self.send(method, request).await
    }

    async fn get_query<Q: Serialize + ?Sized>(&self, method: &str, query: &Q) -> Result<Value, BotError> {
        let request = self.http.get(self.method_url(method)).query(query);
        self.send(method, request).await
    }

    async fn send(&self, method: &str, request: RequestBuilder) -> Result<Value, BotError> {
        let resp = request
            .bearer_auth(&self.token.token_value.0)
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("{method} request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(BotError::SlackApiError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| BotError::SlackApiError(format!("{method} JSON parse error: {e}")))
    }

    /// Fetch the single message at or immediately before `ts` in `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, Slack reports `ok: false`, or
    /// the history window is empty.
    pub async fn fetch_message(&self, channel: &str, ts: &str) -> Result<ChatMessage, BotError> {
        // Read methods take form/query arguments only.
        let request = HistoryRequest {
            channel,
            latest: ts,
            limit: 1,
            inclusive: true,
        };

        let body = self.get_query("conversations.history", &request).await?;
        let history: HistoryResponse = serde_json::from_value(body).map_err(|e| {
            BotError::SlackApiError(format!("conversations.history response shape: {e}"))
        })?;

        if !history.ok {
            return Err(BotError::SlackApiError(format!(
                "conversations.history error: {}",
                history.error.as_deref().unwrap_or("unknown")
            )));
        }

        let message = history
            .messages
            .into_iter()
            .next()
            .ok_or_else(|| BotError::MessageNotFound {
                channel: channel.to_string(),
                ts: ts.to_string(),
            })?;

        debug!(
            channel = %channel,
            ts = %message.ts.0,
            reactions = message.reactions.len(),
            "Fetched reacted message"
        );

        Ok(message)
    }

    /// Post a plain-text reply into the thread rooted at `thread_ts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or Slack returns an error.
    pub async fn post_thread_reply(
        &self,
        channel: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<(), BotError> {
        let channel_id = SlackChannelId(channel.to_string());
        let thread = SlackTs(thread_ts.to_string());
        let request = ThreadReplyRequest {
            channel: &channel_id,
            text,
            thread_ts: &thread,
        };

        let body = self.post_json("chat.postMessage", &request).await?;

        if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
            return Err(BotError::SlackApiError(format!(
                "chat.postMessage error: {}",
                body.get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
            )));
        }

        info!(channel = %channel, thread_ts = %thread_ts, "Posted thread reply");
        Ok(())
    }
}
