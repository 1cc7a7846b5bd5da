use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::config::ObservabilityConfig;

/// Initialize structured logging.
///
/// `RUST_LOG` wins over the configured level. Calling this twice returns an
/// error instead of panicking, so tests and hosts can both call it.
pub fn init_telemetry(settings: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if settings.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    tracing::info!(
        log_level = %settings.log_level,
        json = settings.json_logs,
        "workout-flow telemetry initialized"
    );
    Ok(())
}

/// Span carrying the identity of one workflow instance
pub fn instance_span(workflow_id: Uuid) -> tracing::Span {
    tracing::info_span!(
        "workout_workflow",
        workflow.id = %workflow_id,
        otel.kind = "internal"
    )
}
