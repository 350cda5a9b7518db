use crate::error::TlsError;
use crate::ApiResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadKind {
    /// Full report sent on connect and on every connect period.
    Connect,
    /// Archives discovered since the previous report.
    Update,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Connect => f.write_str("connect"),
            PayloadKind::Update => f.write_str("update"),
        }
    }
}

/// A serialized report waiting for delivery.
#[derive(Debug, Clone)]
pub struct Payload {
    pub kind: PayloadKind,
    pub id_hash: String,
    pub body: Vec<u8>,
}

/// Sends serialized reports somewhere (HTTP endpoint, local archive dir).
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    fn name(&self) -> &str;

    /// Checks the client could deliver right now, e.g. key material exists.
    fn is_ready_to_send(&self) -> ApiResult<()>;

    async fn send(&self, payload: &Payload) -> ApiResult<()>;
}

/// PEM-encoded client identity for mutual TLS.
#[derive(Clone)]
pub struct TlsContext {
    pub certificate_chain: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl fmt::Debug for TlsContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsContext")
            .field("certificate_chain", &self.certificate_chain.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Deferred constructor for the TLS context; only invoked by a transport
/// that actually needs it.
pub type TlsContextFactory = Arc<dyn Fn() -> Result<TlsContext, TlsError> + Send + Sync>;
