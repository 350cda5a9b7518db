use crate::config::InsightsConfig;
use crate::util;
use serde::{Deserialize, Serialize};

/// Static environment metadata captured once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentBlock {
    pub identification_name: String,
    pub agent_version: String,
    pub os: String,
    pub arch: String,
    pub cpu_count: usize,
    pub hostname: Option<String>,
    pub process_id: u32,
    pub working_dir: Option<String>,
}

impl EnvironmentBlock {
    pub fn capture(config: &InsightsConfig) -> Self {
        Self {
            identification_name: config.identification_name.clone(),
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            hostname: util::hostname(),
            process_id: std::process::id(),
            working_dir: std::env::current_dir()
                .ok()
                .map(|p| p.display().to_string()),
        }
    }
}
