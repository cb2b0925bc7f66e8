mod data_source;
mod error;
mod manifest;
mod provider;
pub mod data_sources;

pub use self::data_source::*;
pub use self::error::ProviderError;
pub use self::manifest::*;
pub use self::provider::*;

pub use k8_manifest_config as config;
pub use k8_manifest_schema as schema;
pub use k8_manifest_types as types;
