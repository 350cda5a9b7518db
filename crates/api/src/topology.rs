//! Read-only view of the live server topology.
//!
//! The host owns and mutates the real object graph. It exposes it through
//! these traits, each call returning an owned snapshot of one level:
//! - a server holds services
//! - a service holds connectors and hosts
//! - a host holds deployed contexts
//! - a context exposes its class-loading search path
//!
//! Implementations are expected to be cheap to enumerate and safe to call
//! while the host is deploying or undeploying; no lock is held across calls.

use crate::report::StatusEndpoint;
use std::sync::Arc;

pub trait ServerView: Send + Sync {
    /// Services in container-defined order.
    fn services(&self) -> Vec<Arc<dyn ServiceView>>;

    /// The host's shared background-task executor.
    ///
    /// Borrowed for scheduled work; the host remains responsible for
    /// shutting it down.
    fn utility_executor(&self) -> tokio::runtime::Handle;

    /// Internal status endpoint, if the host provides one.
    fn status_endpoint(&self) -> Option<Arc<dyn StatusEndpoint>> {
        None
    }
}

pub trait ServiceView: Send + Sync {
    fn name(&self) -> String;
    fn connectors(&self) -> Vec<Arc<dyn ConnectorView>>;
    /// Top-level containers of the service's engine.
    fn hosts(&self) -> Vec<Arc<dyn HostView>>;
}

pub trait ConnectorView: Send + Sync {
    /// Best-effort display name (e.g. `http-nio-8080`).
    fn display_name(&self) -> Option<String>;
}

pub trait HostView: Send + Sync {
    fn name(&self) -> String;
    fn contexts(&self) -> Vec<Arc<dyn ContextView>>;
}

pub trait ContextView: Send + Sync {
    fn name(&self) -> String;

    /// Ordered resource locations (URLs) the context loads classes from.
    /// Empty when the context has no loader.
    fn search_path(&self) -> Vec<String>;
}
