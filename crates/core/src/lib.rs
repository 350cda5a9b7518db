pub mod archive;
pub mod config;
pub mod delivery;
pub mod error;
pub mod listener;
pub mod logging;
pub mod report;
pub mod tls;
pub mod topology;
pub mod util;

pub use config::InsightsConfig;
pub use error::{InsightsError, Result};
pub use listener::{InsightsLifecycleListener, LifecycleState};
