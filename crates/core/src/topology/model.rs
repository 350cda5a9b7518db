use indexmap::IndexMap;
use insights_api::ArchiveDescriptor;
use serde::{Deserialize, Serialize};

pub const TOPOLOGY_REPORT_VERSION: &str = "1.0.0";

/// Snapshot of the first service of the server.
///
/// Field order is the serialized order: `version, connectors, hosts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyReport {
    pub version: String,
    pub connectors: Vec<ConnectorEntry>,
    pub hosts: Vec<HostEntry>,
}

impl TopologyReport {
    pub fn empty() -> Self {
        Self {
            version: TOPOLOGY_REPORT_VERSION.to_string(),
            connectors: Vec::new(),
            hosts: Vec::new(),
        }
    }

    pub fn context_count(&self) -> usize {
        self.hosts.iter().map(|h| h.contexts.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorEntry {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEntry {
    pub name: String,
    pub contexts: Vec<ContextEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub name: String,
    pub jars: Vec<JarEntry>,
}

/// Archive descriptor as it appears inside a context; the checksum stays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarEntry {
    pub name: String,
    pub version: String,
    pub attributes: IndexMap<String, String>,
}

impl From<ArchiveDescriptor> for JarEntry {
    fn from(descriptor: ArchiveDescriptor) -> Self {
        Self {
            name: descriptor.name,
            version: descriptor.version,
            attributes: descriptor.attributes,
        }
    }
}
