//! Kubernetes manifest models.
//!
//! Models decode from data source configuration (snake_case keys) and encode
//! into Kubernetes manifests (camelCase keys). Unset optional fields are
//! omitted from the encoded manifest.

mod crd;
mod int_or_string;
mod metadata;
#[cfg(feature = "cert_manager")]
pub mod cert_manager;
#[cfg(feature = "monitoring")]
pub mod monitoring;
#[cfg(feature = "argoproj")]
pub mod argoproj;

pub use self::crd::*;
pub use self::int_or_string::*;
pub use self::metadata::*;
pub use self::spec_def::*;

mod spec_def {

    use std::fmt::Debug;

    use serde::de::DeserializeOwned;
    use serde::Serialize;

    use super::Crd;

    /// Spec of a custom resource that can be rendered as a manifest
    pub trait ManifestSpec:
        Sized + Debug + Clone + Serialize + DeserializeOwned + Send + Sync
    {
        /// if true, resource is namespaced
        const NAME_SPACED: bool = true;

        fn metadata() -> &'static Crd;

        fn label() -> &'static str {
            Self::metadata().names.kind
        }

        fn api_version() -> String {
            let metadata = Self::metadata();
            if metadata.group == "core" {
                return metadata.version.to_owned();
            }
            format!("{}/{}", metadata.group, metadata.version)
        }

        fn kind() -> String {
            Self::metadata().names.kind.to_owned()
        }
    }
}
