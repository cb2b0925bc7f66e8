use thiserror::Error;

use k8_manifest_config::ConfigError;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid number at {0}: only finite numbers are supported")]
    NonFiniteNumber(String),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
