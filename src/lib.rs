/// JukuCho - a Slack bot that answers a message in-thread when someone reacts
/// to it with the `:jukucho:` emoji.
///
/// The crate is deployed as a single AWS Lambda behind a Function URL or API
/// Gateway route registered as the Slack Events API request URL:
/// 1. The URL verification handshake is answered with the challenge
/// 2. `reaction_added` events for the trigger emoji look up the reacted message
/// 3. The message text is sent to the `OpenAI` chat-completions API
/// 4. The completion is posted back as a threaded reply
///
/// Slack redelivers events that are not acknowledged within three seconds;
/// a shared [`dedup::DedupStore`] keyed by the delivery's `event_ts` keeps
/// those retries from producing a second reply.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use jukucho::core::config::AppConfig;
/// use jukucho::dedup::MemoryDedupStore;
/// use jukucho::diagnostics::TracingDiagnostics;
/// use jukucho::slack::ReplyBot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     jukucho::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let bot = ReplyBot::new(
///         &config,
///         Arc::new(MemoryDedupStore::new()),
///         Arc::new(TracingDiagnostics),
///     );
///
///     let outcome = bot
///         .dispatch(r#"{"type":"url_verification","challenge":"abc"}"#)
///         .await?;
///     println!("{outcome:?}");
///     Ok(())
/// }
/// ```
pub mod ai;
pub mod api;
pub mod core;
pub mod dedup;
pub mod diagnostics;
pub mod errors;
pub mod slack;

pub use errors::BotError;
pub use slack::{DispatchOutcome, ReactionOutcome, ReplyBot};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called once at cold start.
///
/// # Example
///
/// ```
/// jukucho::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    tracing_subscriber::registry().with(fmt_layer).init();
}
