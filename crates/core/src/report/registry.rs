use indexmap::IndexMap;
use insights_api::{ApiError, ApiResult, Subreport};
use serde_json::Value;
use std::sync::Arc;

pub const JARS_SECTION: &str = "jars";
pub const TOPOLOGY_SECTION: &str = "topology";
pub const CONTAINER_SECTION: &str = "container";

/// Ordered mapping from section name to subreport.
///
/// Insertion order is the serialized order. Consumers key on the name.
#[derive(Clone, Default)]
pub struct SubreportRegistry {
    sections: IndexMap<String, Arc<dyn Subreport>>,
}

impl SubreportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three sections every report carries, in their required order.
    pub fn standard(
        jars: Arc<dyn Subreport>,
        topology: Arc<dyn Subreport>,
        container: Arc<dyn Subreport>,
    ) -> Self {
        let mut registry = Self::new();
        registry.insert(JARS_SECTION, jars);
        registry.insert(TOPOLOGY_SECTION, topology);
        registry.insert(CONTAINER_SECTION, container);
        registry
    }

    /// Adds a section; replacing an existing name keeps its position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        subreport: Arc<dyn Subreport>,
    ) -> Option<Arc<dyn Subreport>> {
        self.sections.insert(name.into(), subreport)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Subreport>> {
        self.sections.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Generate every section in order. One failing section fails the whole
    /// report; no section may be silently absent.
    pub fn generate_all(&self) -> ApiResult<IndexMap<String, Value>> {
        let mut out = IndexMap::with_capacity(self.sections.len());
        for (name, subreport) in &self.sections {
            let value = subreport
                .generate()
                .map_err(|e| ApiError::Internal(format!("subreport {name}: {e}")))?;
            out.insert(name.clone(), value);
        }
        Ok(out)
    }
}
