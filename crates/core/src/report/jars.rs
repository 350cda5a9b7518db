//! Classpath-wide archive inventory.

use crate::archive::JarInspector;
use insights_api::{ApiError, ApiResult, ArchiveDescriptor, Subreport};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const JARS_REPORT_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
pub struct JarsReport<'a> {
    pub version: &'a str,
    pub jars: &'a [ArchiveDescriptor],
}

/// Inventory of every archive reachable from the configured classpath.
///
/// Directories are expanded recursively in file-name order; plain archive
/// paths are inspected directly.
pub struct ClasspathJarsSubreport {
    classpath: Vec<PathBuf>,
    inspector: JarInspector,
    /// Checksums already included in a report.
    reported: Mutex<HashSet<String>>,
}

impl ClasspathJarsSubreport {
    pub fn new(classpath: Vec<PathBuf>, inspector: JarInspector) -> Self {
        Self {
            classpath,
            inspector,
            reported: Mutex::new(HashSet::new()),
        }
    }

    pub fn scan(&self) -> Vec<ArchiveDescriptor> {
        let mut descriptors = Vec::new();
        for path in self.archive_paths() {
            match self.inspector.inspect_path(&path) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(e) => info!("Skipping classpath archive {}: {}", path.display(), e),
            }
        }
        descriptors
    }

    /// Archives not included in any previous report; marks them reported.
    pub fn take_new_archives(&self) -> Vec<ArchiveDescriptor> {
        let scanned = self.scan();
        let mut reported = self.reported.lock().unwrap_or_else(|e| e.into_inner());
        scanned
            .into_iter()
            .filter(|d| reported.insert(d.checksum.clone()))
            .collect()
    }

    fn mark_reported(&self, descriptors: &[ArchiveDescriptor]) {
        let mut reported = self.reported.lock().unwrap_or_else(|e| e.into_inner());
        reported.extend(descriptors.iter().map(|d| d.checksum.clone()));
    }

    fn archive_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for entry in &self.classpath {
            if entry.is_dir() {
                paths.extend(Self::archives_under(entry));
            } else if entry.is_file() && JarInspector::is_archive_path(entry) {
                paths.push(entry.clone());
            } else {
                debug!("Ignoring classpath entry {}", entry.display());
            }
        }
        paths
    }

    fn archives_under(dir: &Path) -> impl Iterator<Item = PathBuf> {
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && JarInspector::is_archive_path(e.path()))
            .map(|e| e.into_path())
    }
}

impl Subreport for ClasspathJarsSubreport {
    fn version(&self) -> &str {
        JARS_REPORT_VERSION
    }

    fn generate(&self) -> ApiResult<Value> {
        let jars = self.scan();
        self.mark_reported(&jars);
        jars_value(&jars)
    }
}

pub fn jars_value(jars: &[ArchiveDescriptor]) -> ApiResult<Value> {
    serde_json::to_value(JarsReport {
        version: JARS_REPORT_VERSION,
        jars,
    })
    .map_err(|e| ApiError::Internal(e.to_string()))
}
