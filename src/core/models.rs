use serde::{Deserialize, Serialize};
use slack_morphism::{SlackChannelId, SlackTs};

pub const URL_VERIFICATION: &str = "url_verification";
pub const REACTION_ADDED: &str = "reaction_added";

/// Outer Events API envelope as delivered to the webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct SlackEnvelope {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub event: Option<InboundEvent>,
}

impl SlackEnvelope {
    #[must_use]
    pub fn is_url_verification(&self) -> bool {
        self.kind == URL_VERIFICATION
    }
}

/// The inner `event` object. Only the fields used for reaction handling are
/// modelled; every other event type deserializes with them left empty.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reaction: Option<String>,
    #[serde(default)]
    pub item: Option<ReactionItem>,
    #[serde(default)]
    pub event_ts: Option<String>,
}

impl InboundEvent {
    #[must_use]
    pub fn is_reaction_added(&self, reaction: &str) -> bool {
        self.kind == REACTION_ADDED && self.reaction.as_deref() == Some(reaction)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionItem {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// A single message as returned by `conversations.history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub ts: SlackTs,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl ChatMessage {
    /// Count of the first reaction named `name`, or 0 when absent.
    #[must_use]
    pub fn reaction_count(&self, name: &str) -> u32 {
        self.reactions
            .iter()
            .find(|r| r.name == name)
            .map_or(0, |r| r.count)
    }
}

/// Query arguments for `conversations.history`.
#[derive(Debug, Serialize)]
pub struct HistoryRequest<'a> {
    pub channel: &'a str,
    pub latest: &'a str,
    pub limit: u16,
    pub inclusive: bool,
}

#[derive(Debug, Serialize)]
pub struct ThreadReplyRequest<'a> {
    pub channel: &'a SlackChannelId,
    pub text: &'a str,
    pub thread_ts: &'a SlackTs,
}
