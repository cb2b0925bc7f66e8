use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::ManifestSpec;

/// metadata block of a manifest.
/// namespace is only present for namespaced resources
#[derive(Deserialize, Serialize, PartialEq, Eq, Debug, Default, Clone)]
pub struct ManifestMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl fmt::Display for ManifestMeta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}:{}", self.name, ns),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Kubernetes manifest as written to YAML
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<S>
where
    S: ManifestSpec,
{
    pub api_version: String,
    pub kind: String,
    pub metadata: ManifestMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec: Option<S>,
}

impl<S> Manifest<S>
where
    S: ManifestSpec,
{
    /// apiVersion and kind are always taken from the spec's CRD
    pub fn new(metadata: ManifestMeta, spec: Option<S>) -> Self {
        Self {
            api_version: S::api_version(),
            kind: S::kind(),
            metadata,
            spec,
        }
    }
}

/// Common label selector
#[derive(Deserialize, Serialize, Default, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct LabelSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_labels: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_expressions: Option<Vec<LabelSelectorRequirement>>,
}

#[derive(Deserialize, Serialize, Default, Debug, PartialEq, Eq, Clone)]
pub struct LabelSelectorRequirement {
    pub key: String,
    pub operator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
}

/// Reference to a key of a secret
#[derive(Deserialize, Serialize, Default, Debug, PartialEq, Eq, Clone)]
pub struct SecretKeySelector {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}
