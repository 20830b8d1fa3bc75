//! Sink for errors swallowed by the webhook path.
//!
//! The webhook must always acknowledge quickly, so failures after parsing are
//! handed here instead of being returned to Slack.

use async_trait::async_trait;
use tracing::error;

#[async_trait]
pub trait DiagnosticsSink: Send + Sync {
    async fn record(&self, label: &str, detail: &str);
}

/// Writes diagnostics to the structured log stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

#[async_trait]
impl DiagnosticsSink for TracingDiagnostics {
    async fn record(&self, label: &str, detail: &str) {
        error!(label = %label, detail = %detail, "diagnostic recorded");
    }
}
