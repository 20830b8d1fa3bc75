use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::client::SlackClient;
use crate::ai::LlmClient;
use crate::core::config::AppConfig;
use crate::core::models::{InboundEvent, SlackEnvelope};
use crate::dedup::DedupStore;
use crate::diagnostics::DiagnosticsSink;
use crate::errors::BotError;

/// Label under which swallowed processing errors are recorded.
pub const ERROR_LABEL: &str = "error:";

/// Result of handling a matching reaction event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// A reply was posted into the message's thread.
    Replied { reply: String },
    /// The message did not carry exactly one trigger reaction.
    CountMismatch(u32),
    /// This delivery id was already handled within the TTL window.
    Duplicate,
}

/// Result of dispatching one webhook body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// URL verification handshake; the challenge must be echoed back.
    Challenge(String),
    /// Not the trigger reaction; nothing was done.
    Ignored,
    Handled(ReactionOutcome),
    /// Processing failed after parsing; the error was recorded.
    Failed(String),
}

/// Reacts to the trigger emoji by answering the reacted message in-thread.
pub struct ReplyBot {
    slack_client: SlackClient,
    llm_client: LlmClient,
    dedup: Arc<dyn DedupStore>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    trigger_reaction: String,
    dedup_ttl: Duration,
}

impl ReplyBot {
    #[must_use]
    pub fn new(
        config: &AppConfig,
        dedup: Arc<dyn DedupStore>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            slack_client: SlackClient::new(
                config.slack_bot_token.clone(),
                config.slack_api_base_url.clone(),
            ),
            llm_client: LlmClient::from_config(config),
            dedup,
            diagnostics,
            trigger_reaction: config.trigger_reaction.clone(),
            dedup_ttl: config.dedup_ttl,
        }
    }

    #[must_use]
    pub fn slack_client(&self) -> &SlackClient {
        &self.slack_client
    }

    #[must_use]
    pub fn llm_client(&self) -> &LlmClient {
        &self.llm_client
    }

    #[must_use]
    pub fn trigger_reaction(&self) -> &str {
        &self.trigger_reaction
    }

    /// Handle one raw Events API body.
    ///
    /// # Errors
    ///
    /// Only a body that does not parse as an event envelope is an error.
    /// Failures after parsing are recorded to the diagnostics sink and
    /// reported as [`DispatchOutcome::Failed`].
    pub async fn dispatch(&self, body: &str) -> Result<DispatchOutcome, BotError> {
        let envelope: SlackEnvelope = serde_json::from_str(body)?;

        if envelope.is_url_verification() {
            info!("Answering URL verification challenge");
            return Ok(DispatchOutcome::Challenge(
                envelope.challenge.unwrap_or_default(),
            ));
        }

        let Some(event) = envelope
            .event
            .filter(|e| e.is_reaction_added(&self.trigger_reaction))
        else {
            debug!(envelope_type = %envelope.kind, "Ignoring non-trigger event");
            return Ok(DispatchOutcome::Ignored);
        };

        match self.handle_reaction_event(&event).await {
            Ok(outcome) => Ok(DispatchOutcome::Handled(outcome)),
            Err(e) => {
                let detail = e.to_string();
                self.diagnostics.record(ERROR_LABEL, &detail).await;
                Ok(DispatchOutcome::Failed(detail))
            }
        }
    }

    async fn handle_reaction_event(&self, event: &InboundEvent) -> Result<ReactionOutcome, BotError> {
        let item = event
            .item
            .as_ref()
            .ok_or_else(|| BotError::ParseError("reaction event missing item".to_string()))?;
        let channel = item
            .channel
            .as_deref()
            .ok_or_else(|| BotError::ParseError("reaction item missing channel".to_string()))?;
        let ts = item
            .ts
            .as_deref()
            .ok_or_else(|| BotError::ParseError("reaction item missing ts".to_string()))?;
        let event_ts = event
            .event_ts
            .as_deref()
            .ok_or_else(|| BotError::ParseError("reaction event missing event_ts".to_string()))?;

        self.process_reaction(channel, ts, event_ts).await
    }

    /// Look up the reacted message and, if it now carries exactly one trigger
    /// reaction and this delivery is new, post the model's answer in-thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the message lookup, the dedup store, or the reply
    /// post fails. Completion failures are not errors; they produce the
    /// fallback reply.
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn process_reaction(
        &self,
        channel: &str,
        ts: &str,
        event_ts: &str,
    ) -> Result<ReactionOutcome, BotError> {
        let message = self.slack_client.fetch_message(channel, ts).await?;

        let count = message.reaction_count(&self.trigger_reaction);
        if count != 1 {
            info!(count, "Trigger reaction count is not 1; skipping");
            return Ok(ReactionOutcome::CountMismatch(count));
        }

        if !self.dedup.claim(event_ts, self.dedup_ttl).await? {
            warn!("Delivery already handled; skipping retry");
            return Ok(ReactionOutcome::Duplicate);
        }

        let reply = self.llm_client.generate_reply(&message.text).await;
        self.slack_client
            .post_thread_reply(channel, &message.ts.0, &reply)
            .await?;

        Ok(ReactionOutcome::Replied { reply })
    }
}
