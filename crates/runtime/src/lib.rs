use insights_api::LifecycleEvent;
use insights_core::{InsightsConfig, InsightsLifecycleListener, Result};
use std::sync::Arc;

/// Bootstraps a listener wired with the default collaborators.
///
/// Search path entries are inspected with the jar inspector, reports are
/// delivered by the standard controller and written to the configured
/// archive upload directory. Hosts with a network transport attach it with
/// [`InsightsLifecycleListener::with_transport`].
pub fn build_default_listener(config: InsightsConfig) -> Arc<InsightsLifecycleListener> {
    Arc::new(InsightsLifecycleListener::new(config))
}

/// Same as [`build_default_listener`] with configuration read from the
/// `INSIGHTS_*` environment variables.
pub fn build_listener_from_env() -> Result<Arc<InsightsLifecycleListener>> {
    let config = InsightsConfig::from_env()?;
    tracing::debug!("Loaded insights configuration: {:?}", config);
    Ok(build_default_listener(config))
}

/// Forwards a host event and logs any rejection before returning it.
pub fn dispatch(listener: &InsightsLifecycleListener, event: &LifecycleEvent) -> Result<()> {
    let result = listener.lifecycle_event(event);
    if let Err(e) = &result {
        match std::error::Error::source(e) {
            Some(cause) => tracing::error!(
                "Insights listener rejected {:?} event: {}: {}",
                event.kind,
                e,
                cause
            ),
            None => tracing::error!("Insights listener rejected {:?} event: {}", event.kind, e),
        }
    }
    result
}

/// Installs file logging under `~/.insights/logs` named after `component`.
/// Keep the guard alive for as long as logs should be flushed.
pub fn init_logging(component: &str) -> tracing_appender::non_blocking::WorkerGuard {
    insights_core::logging::init_logging(component, false)
}
