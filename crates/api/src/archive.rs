use crate::error::ArchiveError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identity and metadata of one dependency archive found on a search path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveDescriptor {
    pub name: String,
    pub version: String,
    pub attributes: IndexMap<String, String>,
    /// Opaque content identity; stable for identical archive bytes.
    pub checksum: String,
}

impl ArchiveDescriptor {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            attributes: IndexMap::new(),
            checksum: String::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }
}

/// Turns a loadable-resource location into an archive descriptor.
pub trait ArchiveInspector: Send + Sync {
    /// Returns `Ok(None)` for locations that are valid but not archives
    /// (class directories, unsupported schemes).
    fn inspect(&self, location: &str) -> Result<Option<ArchiveDescriptor>, ArchiveError>;
}
