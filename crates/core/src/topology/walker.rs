use super::model::{ConnectorEntry, ContextEntry, HostEntry, JarEntry, TopologyReport};
use insights_api::{ArchiveInspector, ContextView, HostView, ServerView, ServiceView};
use std::sync::Arc;
use tracing::{debug, info};

/// Name used for connectors that expose no display name.
pub const UNKNOWN_CONNECTOR: &str = "unknown";

/// Single-pass, best-effort reader of the live server topology.
///
/// Only the first service is walked; later services are ignored. The walk
/// takes no lock on the topology: concurrent (un)deployment may or may not
/// be reflected. It never fails; a bad search path entry only drops that
/// entry.
pub struct TopologyWalker {
    inspector: Arc<dyn ArchiveInspector>,
}

impl TopologyWalker {
    pub fn new(inspector: Arc<dyn ArchiveInspector>) -> Self {
        Self { inspector }
    }

    pub fn walk(&self, server: &dyn ServerView) -> TopologyReport {
        let mut report = TopologyReport::empty();

        let services = server.services();
        let Some(service) = services.first() else {
            debug!("Server has no services; topology is empty");
            return report;
        };
        if services.len() > 1 {
            debug!(
                "Walking service {} only; {} more ignored",
                service.name(),
                services.len() - 1
            );
        }

        report.connectors = Self::walk_connectors(service.as_ref());
        report.hosts = service
            .hosts()
            .iter()
            .map(|host| self.walk_host(host.as_ref()))
            .collect();
        debug!(
            "Walked {} connectors and {} contexts",
            report.connectors.len(),
            report.context_count()
        );
        report
    }

    fn walk_connectors(service: &dyn ServiceView) -> Vec<ConnectorEntry> {
        service
            .connectors()
            .iter()
            .map(|connector| ConnectorEntry {
                name: connector
                    .display_name()
                    .unwrap_or_else(|| UNKNOWN_CONNECTOR.to_string()),
            })
            .collect()
    }

    fn walk_host(&self, host: &dyn HostView) -> HostEntry {
        HostEntry {
            name: host.name(),
            contexts: host
                .contexts()
                .iter()
                .map(|context| self.walk_context(context.as_ref()))
                .collect(),
        }
    }

    fn walk_context(&self, context: &dyn ContextView) -> ContextEntry {
        let name = context.name();
        let mut jars = Vec::new();

        for location in context.search_path() {
            match self.inspector.inspect(&location) {
                Ok(Some(descriptor)) => jars.push(JarEntry::from(descriptor)),
                Ok(None) => {}
                Err(e) => info!("Skipping {} in context {}: {}", location, name, e),
            }
        }

        ContextEntry { name, jars }
    }
}
