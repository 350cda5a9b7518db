pub mod archive;
pub mod delivery;
pub mod error;
pub mod lifecycle;
pub mod report;
pub mod topology;

// Re-export commonly used types
pub use archive::{ArchiveDescriptor, ArchiveInspector};
pub use delivery::{DeliveryClient, Payload, PayloadKind, TlsContext, TlsContextFactory};
pub use error::{ApiError, ApiResult, ArchiveError, TlsError};
pub use lifecycle::{LifecycleEvent, LifecycleEventKind, LifecycleSource};
pub use report::{StatusEndpoint, Subreport};
pub use topology::{ConnectorView, ContextView, HostView, ServerView, ServiceView};
