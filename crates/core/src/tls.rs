//! Client key material for mutual TLS.

use crate::config::InsightsConfig;
use insights_api::{TlsContext, TlsContextFactory, TlsError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PEM_ARMOR: &str = "-----BEGIN ";

/// Loads the PEM certificate chain and private key named by the config.
#[derive(Debug, Clone)]
pub struct PemSupport {
    cert_file_path: PathBuf,
    key_file_path: PathBuf,
}

impl PemSupport {
    pub fn new(config: &InsightsConfig) -> Self {
        Self {
            cert_file_path: config.cert_file_path.clone(),
            key_file_path: config.key_file_path.clone(),
        }
    }

    pub fn create_tls_context(&self) -> Result<TlsContext, TlsError> {
        Ok(TlsContext {
            certificate_chain: read_pem(&self.cert_file_path)?,
            private_key: read_pem(&self.key_file_path)?,
        })
    }

    /// Deferred factory: nothing is read until a transport asks for it.
    pub fn into_factory(self) -> TlsContextFactory {
        Arc::new(move || self.create_tls_context())
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, TlsError> {
    if !path.exists() {
        return Err(TlsError::MissingMaterial(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    if !String::from_utf8_lossy(&bytes).contains(PEM_ARMOR) {
        return Err(TlsError::InvalidMaterial {
            path: path.display().to_string(),
            reason: "no PEM block found".to_string(),
        });
    }
    Ok(bytes)
}
