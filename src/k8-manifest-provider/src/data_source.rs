use serde_json::Value;

use k8_manifest_schema::Diagnostics;
use k8_manifest_schema::Schema;

/// computed attribute holding the rendered manifest
pub const YAML_ATTRIBUTE: &str = "yaml";

#[derive(Debug, Clone, Default)]
pub struct ReadRequest {
    pub config: Value,
}

impl ReadRequest {
    pub fn new(config: Value) -> Self {
        Self { config }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    /// none when diagnostics contain an error
    pub state: Option<Value>,
    pub diagnostics: Diagnostics,
}

impl ReadResponse {
    pub fn yaml(&self) -> Option<&str> {
        self.state
            .as_ref()
            .and_then(|state| state.get(YAML_ATTRIBUTE))
            .and_then(Value::as_str)
    }
}

/// Read-only data source
pub trait DataSource: Send + Sync {
    /// full type name under provider's type name
    fn type_name(&self, provider_type_name: &str) -> String;

    /// API group of the resource rendered by this data source
    fn group(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn validate_config(&self, config: &Value) -> Diagnostics {
        self.schema().validate(config)
    }

    fn read(&self, request: ReadRequest) -> ReadResponse;
}
