use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize tracing for a CLI run.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are emitted, or debug
/// output when `verbose` is set. Console progress goes to stdout through
/// [`crate::logging::ConsoleLogger`], so diagnostics are written to stderr.
pub fn init_telemetry(verbose: bool, json: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    // The console target duplicates stdout progress; only JSON output keeps it
    let directives = if json {
        format!("ado2gh={default_level},ado2gh::console=info,octocrab=warn")
    } else {
        format!("ado2gh={default_level},ado2gh::console=off,octocrab=warn")
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!("ado2gh telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking the events of one run
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping a whole migration command
pub fn create_migration_span(
    operation: &str,
    source: &str,
    target: &str,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "migration",
        operation = operation,
        source.repo = source,
        target.repo = target,
        correlation.id = correlation_id,
    )
}
