use insights_api::{ApiResult, StatusEndpoint, Subreport};
use serde_json::{Map, Value, json};
use std::sync::Arc;

pub const STATUS_REPORT_VERSION: &str = "1.0.0";

/// Container status as rendered by the host's internal status endpoint.
///
/// Without an endpoint the section is still emitted with an empty `status`.
pub struct ContainerStatusSubreport {
    endpoint: Option<Arc<dyn StatusEndpoint>>,
}

impl ContainerStatusSubreport {
    pub fn new(endpoint: Option<Arc<dyn StatusEndpoint>>) -> Self {
        Self { endpoint }
    }
}

impl Subreport for ContainerStatusSubreport {
    fn version(&self) -> &str {
        STATUS_REPORT_VERSION
    }

    fn generate(&self) -> ApiResult<Value> {
        let status = match &self.endpoint {
            Some(endpoint) => endpoint.render()?,
            None => Value::Object(Map::new()),
        };
        Ok(json!({ "version": STATUS_REPORT_VERSION, "status": status }))
    }
}
