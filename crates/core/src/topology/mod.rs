//! Server topology section of the report.

pub mod model;
pub mod walker;

pub use model::{
    ConnectorEntry, ContextEntry, HostEntry, JarEntry, TOPOLOGY_REPORT_VERSION, TopologyReport,
};
pub use walker::TopologyWalker;

use insights_api::{ApiError, ApiResult, ServerView, Subreport};
use serde_json::Value;
use std::sync::Arc;

/// Subreport backed by a fresh topology walk on every generation.
pub struct TopologySubreport {
    server: Arc<dyn ServerView>,
    walker: TopologyWalker,
}

impl TopologySubreport {
    pub fn new(server: Arc<dyn ServerView>, walker: TopologyWalker) -> Self {
        Self { server, walker }
    }

    pub fn snapshot(&self) -> TopologyReport {
        self.walker.walk(self.server.as_ref())
    }
}

impl Subreport for TopologySubreport {
    fn version(&self) -> &str {
        TOPOLOGY_REPORT_VERSION
    }

    fn generate(&self) -> ApiResult<Value> {
        serde_json::to_value(self.snapshot()).map_err(|e| ApiError::Internal(e.to_string()))
    }
}
