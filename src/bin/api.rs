use std::sync::Arc;

use jukucho::BotError;
use jukucho::api::{ApiContext, handler};
use jukucho::core::config::AppConfig;
use jukucho::dedup::DynamoDedupStore;
use jukucho::diagnostics::TracingDiagnostics;
use jukucho::slack::ReplyBot;
use lambda_runtime::Error;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    jukucho::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(BotError::ConfigError(e))
    })?;

    // A process-local store would let concurrent retries through.
    let table_name = config.dedup_table_name.clone().ok_or_else(|| {
        error!("Config error: DEDUP_TABLE_NAME is not set");
        Error::from(BotError::ConfigError(
            "DEDUP_TABLE_NAME: environment variable not found".to_string(),
        ))
    })?;
    info!(table = %table_name, model = %config.openai_model, "Starting webhook handler");

    let dedup = Arc::new(DynamoDedupStore::from_env(table_name).await);
    let bot = ReplyBot::new(&config, dedup, Arc::new(TracingDiagnostics));
    let ctx = Arc::new(ApiContext::new(config, bot));

    lambda_runtime::run(lambda_runtime::service_fn(move |event| {
        let ctx = Arc::clone(&ctx);
        async move { handler(&ctx, event).await }
    }))
    .await
}
