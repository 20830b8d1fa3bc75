use std::env;
use std::time::Duration;

use crate::ai::prompt::{DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT};

pub const DEFAULT_TRIGGER_REACTION: &str = "jukucho";
pub const DEFAULT_DEDUP_TTL_SECS: u64 = 600;
pub const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_signing_secret: Option<String>,
    pub openai_api_key: String,
    pub openai_org_id: Option<String>,
    pub openai_model: String,
    pub system_prompt: String,
    pub trigger_reaction: String,
    pub dedup_table_name: Option<String>,
    pub dedup_ttl: Duration,
    pub slack_api_base_url: String,
    pub openai_api_base_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset so a blank variable in the Lambda
    /// console falls back to the default rather than overriding it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| format!("{key}: environment variable not found"));

        let dedup_ttl_secs = match get("DEDUP_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("DEDUP_TTL_SECS: {e}"))?,
            None => DEFAULT_DEDUP_TTL_SECS,
        };
        // A zero window would let every retry through.
        if dedup_ttl_secs == 0 {
            return Err("DEDUP_TTL_SECS: must be greater than zero".to_string());
        }

        Ok(Self {
            slack_bot_token: require("SLACK_BOT_TOKEN")?,
            slack_signing_secret: get("SLACK_SIGNING_SECRET"),
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_org_id: get("OPENAI_ORG_ID"),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            system_prompt: get("SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            trigger_reaction: get("TRIGGER_REACTION")
                .unwrap_or_else(|| DEFAULT_TRIGGER_REACTION.to_string()),
            dedup_table_name: get("DEDUP_TABLE_NAME"),
            dedup_ttl: Duration::from_secs(dedup_ttl_secs),
            slack_api_base_url: get("SLACK_API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE_URL.to_string()),
            openai_api_base_url: get("OPENAI_API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_API_BASE_URL.to_string()),
        })
    }
}
