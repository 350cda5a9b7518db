use crate::config::InsightsConfig;
use crate::error::Result;
use crate::util;
use async_trait::async_trait;
use insights_api::{ApiError, ApiResult, DeliveryClient, Payload, TlsContextFactory};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Builds the client used for one controller's lifetime.
pub type ClientFactory = Arc<dyn Fn() -> Result<Box<dyn DeliveryClient>> + Send + Sync>;

/// Host-provided network transport (HTTPS upload).
///
/// Receives the deferred TLS factory; a transport that needs TLS calls it
/// while being created, so a key material problem surfaces at startup.
pub trait TransportFactory: Send + Sync {
    fn create(
        &self,
        config: &InsightsConfig,
        tls: TlsContextFactory,
    ) -> Result<Box<dyn DeliveryClient>>;
}

/// Writes each payload as a JSON file into the archive upload directory.
pub struct FileWritingClient {
    dir: PathBuf,
    sequence: AtomicU64,
}

impl FileWritingClient {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &InsightsConfig) -> Self {
        Self::new(config.archive_upload_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(&self, payload: &Payload) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        format!(
            "{}_{}_{}_{}.json",
            payload.id_hash,
            payload.kind,
            util::now_millis(),
            seq
        )
    }
}

#[async_trait]
impl DeliveryClient for FileWritingClient {
    fn name(&self) -> &str {
        "file"
    }

    fn is_ready_to_send(&self) -> ApiResult<()> {
        Ok(())
    }

    async fn send(&self, payload: &Payload) -> ApiResult<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            ApiError::Unavailable(format!("cannot create {}: {e}", self.dir.display()))
        })?;
        let path = self.dir.join(self.file_name(payload));
        tokio::fs::write(&path, &payload.body)
            .await
            .map_err(|e| ApiError::Unavailable(format!("cannot write {}: {e}", path.display())))?;
        debug!("Wrote {} report to {}", payload.kind, path.display());
        Ok(())
    }
}

/// Tries each client in order until one accepts the payload.
pub struct MultiClient {
    clients: Vec<Box<dyn DeliveryClient>>,
}

impl MultiClient {
    pub fn new(clients: Vec<Box<dyn DeliveryClient>>) -> Self {
        Self { clients }
    }

    pub fn client_names(&self) -> Vec<&str> {
        self.clients.iter().map(|c| c.name()).collect()
    }
}

#[async_trait]
impl DeliveryClient for MultiClient {
    fn name(&self) -> &str {
        "multi"
    }

    /// Ready when any client is ready.
    fn is_ready_to_send(&self) -> ApiResult<()> {
        let mut last_err = ApiError::Unavailable("no delivery clients configured".to_string());
        for client in &self.clients {
            match client.is_ready_to_send() {
                Ok(()) => return Ok(()),
                Err(e) => last_err = e,
            }
        }
        Err(last_err)
    }

    async fn send(&self, payload: &Payload) -> ApiResult<()> {
        let mut last_err = ApiError::Unavailable("no delivery clients configured".to_string());
        for client in &self.clients {
            if let Err(e) = client.is_ready_to_send() {
                debug!("Client {} not ready: {}", client.name(), e);
                last_err = e;
                continue;
            }
            match client.send(payload).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("Client {} failed to send {} report: {}", client.name(), payload.kind, e);
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}
