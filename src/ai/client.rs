//! LLM (`OpenAI`) API client module
//!
//! Turns the text of a reacted message into a single chat completion.

use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{error, info};

use super::prompt::FALLBACK_REPLY;
use crate::core::config::AppConfig;
use crate::errors::BotError;

/// LLM API client for generating thread replies
pub struct LlmClient {
    http: Client,
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    system_prompt: String,
    base_url: String,
}

impl LlmClient {
    #[must_use]
    pub fn new(
        api_key: String,
        org_id: Option<String>,
        model_name: String,
        system_prompt: String,
        base_url: String,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_key,
            org_id,
            model_name,
            system_prompt,
            base_url,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.openai_api_key.clone(),
            config.openai_org_id.clone(),
            config.openai_model.clone(),
            config.system_prompt.clone(),
            config.openai_api_base_url.clone(),
        )
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Fixed persona message followed by the user's text, verbatim.
    #[must_use]
    pub fn build_prompt(&self, input: &str) -> Vec<ChatCompletionMessage> {
        vec![
            ChatCompletionMessage {
                role: MessageRole::system,
                content: Content::Text(self.system_prompt.clone()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
            ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(input.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            },
        ]
    }

    /// Returns the model's reply, or [`FALLBACK_REPLY`] on any failure.
    pub async fn generate_reply(&self, input: &str) -> String {
        match self.request_completion(input).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Error occurred: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the status is not 200, or
    /// the response has no first choice with message content.
    pub async fn request_completion(&self, input: &str) -> Result<String, BotError> {
        let prompt = self.build_prompt(input);

        #[cfg(feature = "debug-logs")]
        info!("Using ChatGPT prompt:\n{:?}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            model = %self.model_name,
            input_chars = input.chars().count(),
            "Requesting chat completion"
        );

        let request_body = json!({
            "model": self.model_name,
            "messages": build_chat_messages(&prompt),
        });

        let mut request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body);

        if let Some(org) = &self.org_id {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BotError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(BotError::OpenAIError(format!(
                "Non-200 response code: {status}: {error_text}"
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BotError::OpenAIError(format!("Failed to parse OpenAI response: {e}")))?;

        extract_reply(&response_json)
    }
}

/// Build the chat-completions `messages` array from a prompt.
pub(crate) fn build_chat_messages(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            match &m.content {
                Content::Text(t) => Some(json!({
                    "role": role_str,
                    "content": t
                })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}

/// `choices[0].message.content`, untouched.
fn extract_reply(response_json: &Value) -> Result<String, BotError> {
    response_json
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(ToString::to_string)
        .ok_or_else(|| BotError::OpenAIError("No message content in first choice".to_string()))
}
