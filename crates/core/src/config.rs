//! Reporting configuration.
//!
//! Values come from `INSIGHTS_*` environment variables; anything unset keeps
//! its default. A malformed value is an error rather than a silent default.

use crate::error::{InsightsError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PREFIX: &str = "INSIGHTS_";

pub const DEFAULT_IDENTIFICATION_NAME: &str = "app-server";
pub const DEFAULT_CERT_FILE_PATH: &str = "/etc/pki/consumer/cert.pem";
pub const DEFAULT_KEY_FILE_PATH: &str = "/etc/pki/consumer/key.pem";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://cert.console.redhat.com";
pub const DEFAULT_ARCHIVE_UPLOAD_DIR: &str = "/var/tmp/insights-runtimes/uploads";
pub const DEFAULT_CONNECT_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_UPDATE_PERIOD: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub identification_name: String,
    pub cert_file_path: PathBuf,
    pub key_file_path: PathBuf,
    pub upload_base_url: String,
    pub archive_upload_dir: PathBuf,
    #[serde(with = "humantime_serde")]
    pub connect_period: Duration,
    #[serde(with = "humantime_serde")]
    pub update_period: Duration,
    pub opt_out: bool,
    pub queue_capacity: usize,
    /// Archives and directories scanned for the classpath-wide inventory.
    pub classpath: Vec<PathBuf>,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            identification_name: DEFAULT_IDENTIFICATION_NAME.to_string(),
            cert_file_path: PathBuf::from(DEFAULT_CERT_FILE_PATH),
            key_file_path: PathBuf::from(DEFAULT_KEY_FILE_PATH),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            archive_upload_dir: PathBuf::from(DEFAULT_ARCHIVE_UPLOAD_DIR),
            connect_period: DEFAULT_CONNECT_PERIOD,
            update_period: DEFAULT_UPDATE_PERIOD,
            opt_out: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            classpath: Vec::new(),
        }
    }
}

impl InsightsConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `key` is the full variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(v) = var("IDENTIFICATION_NAME") {
            config.identification_name = v;
        }
        if let Some(v) = var("CERT_FILE_PATH") {
            config.cert_file_path = PathBuf::from(v);
        }
        if let Some(v) = var("KEY_FILE_PATH") {
            config.key_file_path = PathBuf::from(v);
        }
        if let Some(v) = var("UPLOAD_BASE_URL") {
            config.upload_base_url = v;
        }
        if let Some(v) = var("ARCHIVE_UPLOAD_DIR") {
            config.archive_upload_dir = PathBuf::from(v);
        }
        if let Some(v) = var("CONNECT_PERIOD") {
            config.connect_period = parse_duration("CONNECT_PERIOD", &v)?;
        }
        if let Some(v) = var("UPDATE_PERIOD") {
            config.update_period = parse_duration("UPDATE_PERIOD", &v)?;
        }
        if let Some(v) = var("OPT_OUT") {
            config.opt_out = parse_bool("OPT_OUT", &v)?;
        }
        if let Some(v) = var("QUEUE_CAPACITY") {
            let capacity: usize = v.parse().map_err(|_| {
                InsightsError::Config(format!("{ENV_PREFIX}QUEUE_CAPACITY: not a number: {v}"))
            })?;
            config.queue_capacity = capacity.max(1);
        }
        if let Some(v) = var("CLASSPATH") {
            config.classpath = std::env::split_paths(&v).collect();
        }
        Ok(config)
    }
}

/// Human-readable duration (`300s`, `5m`, `1h 30m`, `1d`); zero is rejected.
pub fn parse_duration(name: &str, value: &str) -> Result<Duration> {
    let duration = humantime::parse_duration(value.trim()).map_err(|e| {
        InsightsError::Config(format!("{ENV_PREFIX}{name}: invalid duration {value}: {e}"))
    })?;
    if duration.is_zero() {
        return Err(InsightsError::Config(format!(
            "{ENV_PREFIX}{name}: duration must be positive"
        )));
    }
    Ok(duration)
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(InsightsError::Config(format!(
            "{ENV_PREFIX}{name}: invalid boolean: {value}"
        ))),
    }
}

mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
