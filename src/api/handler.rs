//! API Lambda handler - validates the Slack request and hands the body to
//! the reply bot.

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{error, info};

use super::{helpers, parsing, signature};
use crate::core::config::AppConfig;
use crate::slack::{DispatchOutcome, ReplyBot};

pub use self::function_handler as handler;

/// Everything an invocation needs, built once per Lambda instance.
pub struct ApiContext {
    pub config: AppConfig,
    pub bot: ReplyBot,
}

impl ApiContext {
    #[must_use]
    pub fn new(config: AppConfig, bot: ReplyBot) -> Self {
        Self { config, bot }
    }
}

/// Lambda handler for the webhook entrypoint.
///
/// # Errors
///
/// Returns an error only when the body is not a parsable event envelope;
/// every other failure is answered with a status code or acknowledged.
#[tracing::instrument(level = "info", skip(ctx, event), fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn function_handler(ctx: &ApiContext, event: LambdaEvent<Value>) -> Result<Value, Error> {
    handle_request(ctx, &event.payload).await
}

/// Process one proxy-integration payload.
///
/// # Errors
///
/// See [`function_handler`].
pub async fn handle_request(ctx: &ApiContext, payload: &Value) -> Result<Value, Error> {
    let headers = payload.get("headers").unwrap_or(&Value::Null);

    let body = match parsing::extract_body(payload) {
        Ok(b) => b,
        Err(e) => {
            error!("Rejecting request: {}", e);
            return Ok(helpers::err_response(400, &e.to_string()));
        }
    };

    if let Some(secret) = ctx.config.slack_signing_secret.as_deref() {
        if let Err(response) = verify_signature(&body, headers, secret) {
            return Ok(response);
        }
        info!("Slack signature verified successfully");
    }

    if let Some(retry_num) = parsing::get_header_value(headers, "X-Slack-Retry-Num") {
        let reason = parsing::get_header_value(headers, "X-Slack-Retry-Reason").unwrap_or("");
        info!(retry_num = %retry_num, retry_reason = %reason, "Slack redelivery");
    }

    let outcome = ctx.bot.dispatch(&body).await.map_err(|e| {
        error!("Failed to parse Slack event: {}", e);
        Error::from(format!("Parse Error: {e}"))
    })?;

    info!(outcome = ?outcome, "Event dispatched");

    Ok(match outcome {
        DispatchOutcome::Challenge(challenge) => helpers::ok_text(&challenge),
        DispatchOutcome::Ignored | DispatchOutcome::Handled(_) | DispatchOutcome::Failed(_) => {
            helpers::ok_empty()
        }
    })
}

fn verify_signature(body: &str, headers: &Value, secret: &str) -> Result<(), Value> {
    let Some(sig) = parsing::get_header_value(headers, "X-Slack-Signature") else {
        error!("Missing X-Slack-Signature header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Signature header",
        ));
    };

    let Some(timestamp) = parsing::get_header_value(headers, "X-Slack-Request-Timestamp") else {
        error!("Missing X-Slack-Request-Timestamp header");
        return Err(helpers::err_response(
            401,
            "Missing X-Slack-Request-Timestamp header",
        ));
    };

    if !signature::verify_slack_signature(body, timestamp, sig, secret) {
        error!("Slack signature verification failed");
        return Err(helpers::err_response(401, "Invalid Slack signature"));
    }

    Ok(())
}
