#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure to turn a class-loading search path entry into an archive descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Invalid archive location {location}: {reason}")]
    InvalidLocation { location: String, reason: String },
    #[error("I/O error reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed archive {location}: {reason}")]
    Format { location: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Missing key material: {0}")]
    MissingMaterial(String),
    #[error("Invalid key material in {path}: {reason}")]
    InvalidMaterial { path: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
