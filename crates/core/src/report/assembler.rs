use super::basic::EnvironmentBlock;
use super::jars::jars_value;
use super::registry::{JARS_SECTION, SubreportRegistry};
use crate::config::InsightsConfig;
use crate::error::Result;
use crate::util;
use indexmap::IndexMap;
use insights_api::ArchiveDescriptor;
use serde::Serialize;
use serde_json::Value;

pub const REPORT_VERSION: &str = "1.0.0";

/// One generated report.
///
/// Serializes flat: `version`, `generated_at`, `basic`, then one key per
/// section in registry order.
#[derive(Debug, Clone, Serialize)]
pub struct InsightsReport {
    pub version: String,
    pub generated_at: u64,
    pub basic: EnvironmentBlock,
    #[serde(flatten)]
    pub subreports: IndexMap<String, Value>,
}

impl InsightsReport {
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.subreports.get(name)
    }
}

/// Builds reports from the registry plus static environment metadata.
pub struct ReportAssembler {
    registry: SubreportRegistry,
    basic: EnvironmentBlock,
    id_hash: String,
}

impl ReportAssembler {
    pub fn new(registry: SubreportRegistry, config: &InsightsConfig) -> Self {
        let basic = EnvironmentBlock::capture(config);
        let id_hash = util::hex_hash(&[
            config.identification_name.as_str(),
            basic.hostname.as_deref().unwrap_or_default(),
        ]);
        Self {
            registry,
            basic,
            id_hash,
        }
    }

    /// Stable identity of this reporting process; names uploaded payloads.
    pub fn id_hash(&self) -> &str {
        &self.id_hash
    }

    pub fn generate(&self) -> Result<InsightsReport> {
        let subreports = self.registry.generate_all()?;
        Ok(self.report_with(subreports))
    }

    /// Generate a fresh report and serialize it.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.generate()?.to_json_bytes()
    }

    /// Serialize a report that only carries newly discovered archives.
    pub fn serialize_update(&self, archives: &[ArchiveDescriptor]) -> Result<Vec<u8>> {
        let mut subreports = IndexMap::with_capacity(1);
        subreports.insert(JARS_SECTION.to_string(), jars_value(archives)?);
        self.report_with(subreports).to_json_bytes()
    }

    fn report_with(&self, subreports: IndexMap<String, Value>) -> InsightsReport {
        InsightsReport {
            version: REPORT_VERSION.to_string(),
            generated_at: util::now_millis(),
            basic: self.basic.clone(),
            subreports,
        }
    }
}
