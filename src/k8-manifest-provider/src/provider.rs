use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use tracing::instrument;

use k8_manifest_config::ProviderConfig;
use k8_manifest_config::DEFAULT_TYPE_NAME;
use k8_manifest_schema::Diagnostics;
use k8_manifest_schema::Schema;

use crate::data_sources;
use crate::DataSource;
use crate::ProviderError;
use crate::ReadRequest;
use crate::ReadResponse;

/// Schemas of all registered data sources by type name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderSchema {
    pub data_sources: BTreeMap<String, Schema>,
}

impl ProviderSchema {
    pub fn to_json(&self) -> Result<String, ProviderError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String, ProviderError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Registry of manifest data sources
pub struct Provider {
    type_name: String,
    data_sources: BTreeMap<String, Box<dyn DataSource>>,
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("type_name", &self.type_name)
            .field("data_sources", &self.data_source_names())
            .finish()
    }
}

impl Default for Provider {
    fn default() -> Self {
        Self::new(DEFAULT_TYPE_NAME)
    }
}

impl Provider {
    /// provider with every built-in data source
    pub fn new<S: Into<String>>(type_name: S) -> Self {
        let mut provider = Self {
            type_name: type_name.into(),
            data_sources: BTreeMap::new(),
        };
        for data_source in data_sources::all() {
            provider.register(data_source);
        }
        provider
    }

    /// provider with configured type name, limited to configured groups
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        config.validate()?;

        let mut provider = Self {
            type_name: config.type_name.clone(),
            data_sources: BTreeMap::new(),
        };
        for data_source in data_sources::all() {
            if config.includes_group(data_source.group()) {
                provider.register(data_source);
            } else {
                debug!(
                    group = data_source.group(),
                    "skipping data source outside configured groups"
                );
            }
        }
        Ok(provider)
    }

    fn register(&mut self, data_source: Box<dyn DataSource>) {
        let name = data_source.type_name(&self.type_name);
        debug!(%name, "registering data source");
        self.data_sources.insert(name, data_source);
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn data_source_names(&self) -> Vec<&str> {
        self.data_sources.keys().map(String::as_str).collect()
    }

    pub fn data_source(&self, name: &str) -> Option<&dyn DataSource> {
        self.data_sources.get(name).map(|ds| ds.as_ref())
    }

    fn find(&self, name: &str) -> Result<&dyn DataSource, ProviderError> {
        self.data_source(name)
            .ok_or_else(|| ProviderError::UnknownDataSource(name.to_owned()))
    }

    pub fn schema(&self) -> ProviderSchema {
        ProviderSchema {
            data_sources: self
                .data_sources
                .iter()
                .map(|(name, ds)| (name.clone(), ds.schema()))
                .collect(),
        }
    }

    pub fn validate_data_source_config(
        &self,
        name: &str,
        config: &Value,
    ) -> Result<Diagnostics, ProviderError> {
        Ok(self.find(name)?.validate_config(config))
    }

    #[instrument(skip(self, config))]
    pub fn read_data_source(&self, name: &str, config: Value) -> Result<ReadResponse, ProviderError> {
        let response = self.find(name)?.read(ReadRequest::new(config));
        debug!(diagnostics = response.diagnostics.len(), "read complete");
        Ok(response)
    }
}

/// decode configuration document, JSON or YAML.
/// `.inf` and `.nan` are rejected since JSON can't hold them
pub fn parse_config(input: &str) -> Result<Value, ProviderError> {
    let document: serde_yaml::Value = serde_yaml::from_str(input)?;
    check_finite(&document, "$")?;
    Ok(serde_json::to_value(document)?)
}

fn check_finite(value: &serde_yaml::Value, path: &str) -> Result<(), ProviderError> {
    match value {
        serde_yaml::Value::Number(number) => match number.as_f64() {
            Some(float) if !float.is_finite() => {
                Err(ProviderError::NonFiniteNumber(path.to_owned()))
            }
            _ => Ok(()),
        },
        serde_yaml::Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                check_finite(item, &format!("{}[{}]", path, index))?;
            }
            Ok(())
        }
        serde_yaml::Value::Mapping(mapping) => {
            for (key, item) in mapping {
                let key = match key.as_str() {
                    Some(key) => format!("{}.{}", path, key),
                    None => format!("{}.{:?}", path, key),
                };
                check_finite(item, &key)?;
            }
            Ok(())
        }
        serde_yaml::Value::Tagged(tagged) => check_finite(&tagged.value, path),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod test {

    use serde_json::json;

    use k8_manifest_config::ProviderConfig;

    use super::parse_config;
    use super::Provider;
    use crate::ProviderError;

    #[test]
    fn test_registered_names() {
        let provider = Provider::new("k8s");
        assert_eq!(
            provider.data_source_names(),
            vec![
                "k8s_argoproj_io_application_v1alpha1_manifest",
                "k8s_cert_manager_io_certificate_v1_manifest",
                "k8s_cert_manager_io_cluster_issuer_v1_manifest",
                "k8s_monitoring_coreos_com_service_monitor_v1_manifest",
            ]
        );
        assert!(provider
            .data_source("k8s_cert_manager_io_certificate_v1_manifest")
            .is_some());
    }

    #[test]
    fn test_group_filter() {
        //given
        let config = ProviderConfig {
            type_name: "acme".to_owned(),
            groups: vec!["cert-manager.io".to_owned()],
            ..Default::default()
        };

        //when
        let provider = Provider::from_config(&config).expect("provider");

        //then
        assert_eq!(provider.type_name(), "acme");
        assert_eq!(
            provider.data_source_names(),
            vec![
                "acme_cert_manager_io_certificate_v1_manifest",
                "acme_cert_manager_io_cluster_issuer_v1_manifest",
            ]
        );
    }

    #[test]
    fn test_invalid_type_name() {
        let config = ProviderConfig {
            type_name: "K8s".to_owned(),
            ..Default::default()
        };
        assert!(matches!(
            Provider::from_config(&config),
            Err(ProviderError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_data_source() {
        let provider = Provider::default();
        let err = provider
            .read_data_source("k8s_widget_v1_manifest", json!({}))
            .expect_err("unknown");
        assert_eq!(err.to_string(), "Unknown data source: k8s_widget_v1_manifest");
        assert!(provider
            .validate_data_source_config("k8s_widget_v1_manifest", &json!({}))
            .is_err());
    }

    #[test]
    fn test_schema() {
        let schema = Provider::default().schema();
        assert_eq!(schema.data_sources.len(), 4);
        let certificate = schema
            .data_sources
            .get("k8s_cert_manager_io_certificate_v1_manifest")
            .expect("certificate");
        assert!(certificate.attribute("yaml").is_some());

        let json = schema.to_json().expect("json");
        assert!(json.contains("\"k8s_argoproj_io_application_v1alpha1_manifest\""));
    }

    #[test]
    fn test_parse_config() {
        let yaml = parse_config("metadata:\n  name: web\n").expect("yaml");
        let json = parse_config(r#"{"metadata": {"name": "web"}}"#).expect("json");
        assert_eq!(yaml, json);
        assert_eq!(yaml, json!({ "metadata": { "name": "web" } }));

        assert!(matches!(
            parse_config("metadata: [web"),
            Err(ProviderError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_config_rejects_non_finite() {
        //given
        let infinite = "spec:\n  revision_history_limit: .inf\n";
        let not_a_number = "spec:\n  ratios: [1.5, .nan]\n";

        //when
        let infinite = parse_config(infinite).expect_err("inf");
        let not_a_number = parse_config(not_a_number).expect_err("nan");

        //then
        assert!(
            matches!(&infinite, ProviderError::NonFiniteNumber(path) if path == "$.spec.revision_history_limit")
        );
        assert!(matches!(&not_a_number, ProviderError::NonFiniteNumber(path) if path == "$.spec.ratios[1]"));
        assert_eq!(
            parse_config("spec:\n  ratio: 1.5\n").expect("finite"),
            json!({ "spec": { "ratio": 1.5 } })
        );
    }
}
