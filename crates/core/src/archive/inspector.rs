use super::manifest::{self, MANIFEST_PATH};
use insights_api::{ArchiveDescriptor, ArchiveError, ArchiveInspector};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;
use url::Url;
use xxhash_rust::xxh3::Xxh3;
use zip::ZipArchive;

pub const ARCHIVE_EXTENSIONS: [&str; 3] = ["jar", "war", "ear"];

pub const PATH_ATTRIBUTE: &str = "path";

const CHECKSUM_BUFFER: usize = 64 * 1024;

/// Reads zip-based archives (jar/war/ear) from local `file:` locations.
#[derive(Debug, Default, Clone)]
pub struct JarInspector;

impl JarInspector {
    pub fn new() -> Self {
        Self
    }

    pub fn is_archive_path(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ARCHIVE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }

    /// Describe an archive on disk.
    pub fn inspect_path(&self, path: &Path) -> Result<ArchiveDescriptor, ArchiveError> {
        let location = path.display().to_string();
        let io_error = |source| ArchiveError::Io {
            location: location.clone(),
            source,
        };
        let checksum = checksum_of(path).map_err(io_error)?;

        let file = File::open(path).map_err(io_error)?;
        let mut archive = ZipArchive::new(file).map_err(|e| ArchiveError::Format {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        // A missing manifest is common for plain library jars.
        let attributes = match archive.by_name(MANIFEST_PATH) {
            Ok(mut entry) => {
                let mut content = String::new();
                entry
                    .read_to_string(&mut content)
                    .map_err(|e| ArchiveError::Format {
                        location: location.clone(),
                        reason: format!("unreadable manifest: {e}"),
                    })?;
                manifest::parse_main_attributes(&content)
            }
            Err(_) => Default::default(),
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| location.clone());
        let version = manifest::version_of(&attributes).unwrap_or_default().to_string();

        let mut descriptor = ArchiveDescriptor::new(name, version).with_checksum(checksum);
        descriptor.attributes = attributes;
        descriptor
            .attributes
            .insert(PATH_ATTRIBUTE.to_string(), location);
        Ok(descriptor)
    }
}

/// Hex xxh3 of the file contents, read in chunks.
fn checksum_of(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::with_capacity(CHECKSUM_BUFFER, File::open(path)?);
    let mut hasher = Xxh3::new();
    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        hasher.update(chunk);
        let len = chunk.len();
        reader.consume(len);
    }
    Ok(format!("{:016x}", hasher.digest()))
}

impl ArchiveInspector for JarInspector {
    fn inspect(&self, location: &str) -> Result<Option<ArchiveDescriptor>, ArchiveError> {
        let url = Url::parse(location).map_err(|e| ArchiveError::InvalidLocation {
            location: location.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "file" {
            debug!("Skipping non-file location {}", location);
            return Ok(None);
        }

        let path = url
            .to_file_path()
            .map_err(|_| ArchiveError::InvalidLocation {
                location: location.to_string(),
                reason: "not a local file path".to_string(),
            })?;

        if path.is_dir() || !Self::is_archive_path(&path) {
            return Ok(None);
        }

        self.inspect_path(&path).map(Some)
    }
}
