#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jukucho::core::config::AppConfig;
use jukucho::dedup::MemoryDedupStore;
use jukucho::diagnostics::DiagnosticsSink;
use jukucho::slack::ReplyBot;

pub const BOT_TOKEN: &str = "xoxb-test";
pub const OPENAI_KEY: &str = "sk-test";
pub const MODEL: &str = "gpt-test";
pub const SYSTEM_PROMPT: &str = "You are a terse programming assistant.";

/// Captures every `(label, detail)` pair handed to the sink.
#[derive(Default)]
pub struct RecordingDiagnostics {
    pub records: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    pub fn records(&self) -> Vec<(String, String)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiagnosticsSink for RecordingDiagnostics {
    async fn record(&self, label: &str, detail: &str) {
        self.records
            .lock()
            .unwrap()
            .push((label.to_string(), detail.to_string()));
    }
}

pub fn test_config(slack_base: &str, openai_base: &str, extra: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("SLACK_BOT_TOKEN".to_string(), BOT_TOKEN.to_string()),
        ("OPENAI_API_KEY".to_string(), OPENAI_KEY.to_string()),
        ("OPENAI_MODEL".to_string(), MODEL.to_string()),
        ("SYSTEM_PROMPT".to_string(), SYSTEM_PROMPT.to_string()),
        ("SLACK_API_BASE_URL".to_string(), slack_base.to_string()),
        ("OPENAI_API_BASE_URL".to_string(), openai_base.to_string()),
    ]);
    for (k, v) in extra {
        vars.insert((*k).to_string(), (*v).to_string());
    }
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub struct Harness {
    pub bot: ReplyBot,
    pub dedup: Arc<MemoryDedupStore>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

pub fn harness(config: &AppConfig) -> Harness {
    let dedup = Arc::new(MemoryDedupStore::new());
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let bot = ReplyBot::new(config, dedup.clone(), diagnostics.clone());
    Harness {
        bot,
        dedup,
        diagnostics,
    }
}

pub fn reaction_event(reaction: &str, channel: &str, ts: &str, event_ts: &str) -> String {
    json!({
        "token": "verification-token",
        "team_id": "T1",
        "api_app_id": "A1",
        "type": "event_callback",
        "event_id": "Ev1",
        "event_time": 1_700_000_000,
        "event": {
            "type": "reaction_added",
            "user": "U1",
            "reaction": reaction,
            "item_user": "U2",
            "item": {"type": "message", "channel": channel, "ts": ts},
            "event_ts": event_ts
        }
    })
    .to_string()
}

pub fn history_body(ts: &str, text: &str, reactions: Value) -> Value {
    json!({
        "ok": true,
        "messages": [{
            "type": "message",
            "user": "U2",
            "ts": ts,
            "text": text,
            "reactions": reactions
        }],
        "has_more": true
    })
}

pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": MODEL,
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

pub fn expected_completion_request(input: &str) -> Value {
    json!({
        "model": MODEL,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": input}
        ]
    })
}
