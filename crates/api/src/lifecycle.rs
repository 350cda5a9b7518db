use crate::topology::ServerView;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    /// Fires once after the server finished starting.
    AfterStart,
    /// Fires once when the server stops.
    Stop,
    /// Fires repeatedly from the host's background thread.
    Periodic,
}

/// The component that emitted a lifecycle event.
#[derive(Clone)]
pub enum LifecycleSource {
    Server(Arc<dyn ServerView>),
    Component { name: String },
}

impl fmt::Debug for LifecycleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleSource::Server(_) => f.write_str("Server"),
            LifecycleSource::Component { name } => {
                f.debug_struct("Component").field("name", name).finish()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub kind: LifecycleEventKind,
    pub source: LifecycleSource,
}

impl LifecycleEvent {
    pub fn new(kind: LifecycleEventKind, source: LifecycleSource) -> Self {
        Self { kind, source }
    }

    pub fn after_start(server: Arc<dyn ServerView>) -> Self {
        Self::new(LifecycleEventKind::AfterStart, LifecycleSource::Server(server))
    }

    pub fn stop(server: Arc<dyn ServerView>) -> Self {
        Self::new(LifecycleEventKind::Stop, LifecycleSource::Server(server))
    }

    pub fn periodic(server: Arc<dyn ServerView>) -> Self {
        Self::new(LifecycleEventKind::Periodic, LifecycleSource::Server(server))
    }

    pub fn server(&self) -> Option<&Arc<dyn ServerView>> {
        match &self.source {
            LifecycleSource::Server(server) => Some(server),
            LifecycleSource::Component { .. } => None,
        }
    }
}
