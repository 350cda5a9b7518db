use crate::ApiResult;
use serde_json::Value;

/// One independently versioned, named section of the report.
pub trait Subreport: Send + Sync {
    /// Schema version of this section.
    fn version(&self) -> &str;

    /// Produce the section as a JSON object whose first field is `version`.
    fn generate(&self) -> ApiResult<Value>;
}

/// The host's internal status representation (thread pools, request
/// counters, memory), rendered as JSON.
pub trait StatusEndpoint: Send + Sync {
    fn render(&self) -> ApiResult<Value>;
}
