use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use dirs::home_dir;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use crate::ConfigError;

pub const CONFIG_ENV: &str = "K8S_MANIFEST_CONFIG";
pub const DEFAULT_TYPE_NAME: &str = "k8s";

fn default_type_name() -> String {
    DEFAULT_TYPE_NAME.to_owned()
}

#[derive(Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    #[serde(skip)]
    pub path: PathBuf,
    /// prefix of every data source type name
    #[serde(default = "default_type_name")]
    pub type_name: String,
    /// API groups to register, all when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            type_name: default_type_name(),
            groups: vec![],
        }
    }
}

impl ProviderConfig {
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home_dir = home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home_dir.join(".k8s-manifest").join("config.yaml"))
    }

    /// read from default home directory
    pub fn from_home() -> Result<Self, ConfigError> {
        Self::from_file(Self::default_path()?)
    }

    pub fn from_file<T: AsRef<Path>>(path: T) -> Result<Self, ConfigError> {
        let file = File::open(path.as_ref())?;
        let mut config: Self = serde_yaml::from_reader(file)?;
        config.path = path.as_ref().to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// config from `K8S_MANIFEST_CONFIG` or home directory.
    /// default config if home directory has no config file
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            debug!(%path, "loading config from env");
            return Self::from_file(path);
        }

        match Self::from_home() {
            Ok(config) => Ok(config),
            Err(ConfigError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
                debug!("no config file found, using default");
                Ok(Self::default())
            }
            Err(ConfigError::NoHomeDir) => Ok(Self::default()),
            Err(err) => Err(err),
        }
    }

    pub fn to_file<T: AsRef<Path>>(&self, path: T) -> Result<(), ConfigError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(serde_yaml::to_writer(file, self)?)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.to_file(&self.path)
    }

    /// type name must be usable as identifier prefix
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut chars = self.type_name.chars();
        let valid = match chars.next() {
            Some(first) => {
                first.is_ascii_lowercase()
                    && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            }
            None => false,
        };
        if valid {
            Ok(())
        } else {
            Err(ConfigError::InvalidTypeName(self.type_name.clone()))
        }
    }

    pub fn includes_group(&self, group: &str) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| g == group)
    }
}

#[cfg(test)]
mod test {

    use super::ProviderConfig;
    use crate::ConfigError;

    #[test]
    fn test_decode_config() {
        let config = ProviderConfig::from_file("data/config.yaml").expect("read");
        assert_eq!(config.type_name, "acme");
        assert_eq!(config.groups.len(), 2);
        assert!(config.includes_group("cert-manager.io"));
        assert!(!config.includes_group("argoproj.io"));
    }

    #[test]
    fn test_default_config() {
        let config: ProviderConfig = serde_yaml::from_str("{}").expect("decode");
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.type_name, "k8s");
        assert!(config.includes_group("argoproj.io"));
    }

    #[test]
    fn test_config_ser() {
        //given
        let config = ProviderConfig::from_file("data/config.yaml").expect("read");

        //when
        let serialized = serde_yaml::to_string(&config).expect("serialized");

        //then
        assert_eq!(
            serialized,
            r#"type_name: acme
groups:
- cert-manager.io
- monitoring.coreos.com
"#
        );
    }

    #[test]
    fn test_invalid_type_name() {
        for name in ["", "K8s", "1k8s", "k8s-x"] {
            let config = ProviderConfig {
                type_name: name.to_owned(),
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidTypeName(_))
            ));
        }
    }

    #[test]
    fn test_missing_file() {
        let err = ProviderConfig::from_file("data/missing.yaml").expect_err("missing");
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
