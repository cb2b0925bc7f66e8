use std::fs::read_to_string;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Subcommand;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

use k8_manifest_provider::parse_config;
use k8_manifest_provider::schema::Diagnostics;
use k8_manifest_provider::Provider;
use k8_manifest_provider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        Ok(match self {
            Self::Json => format!("{}\n", serde_json::to_string_pretty(data)?),
            Self::Yaml => serde_yaml::to_string(data)?,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List data source type names
    List,

    /// Print the schema of a data source, or of every data source
    Schema {
        type_name: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },

    /// Check a configuration file against a data source schema
    Validate {
        type_name: String,

        /// configuration file, JSON or YAML
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Render the manifest for a configuration file
    Render {
        type_name: String,

        /// configuration file, JSON or YAML
        #[arg(short, long)]
        file: PathBuf,
    },
}

impl Command {
    /// run command, diagnostics go to stderr
    pub fn execute<W: Write>(&self, provider: &Provider, out: &mut W) -> Result<()> {
        match self {
            Self::List => {
                for name in provider.data_source_names() {
                    writeln!(out, "{}", name)?;
                }
            }
            Self::Schema { type_name, output } => {
                let text = match type_name {
                    Some(name) => {
                        let data_source = provider
                            .data_source(name)
                            .ok_or_else(|| ProviderError::UnknownDataSource(name.clone()))?;
                        output.format(&data_source.schema())?
                    }
                    None => output.format(&provider.schema())?,
                };
                write!(out, "{}", text)?;
            }
            Self::Validate { type_name, file } => {
                let config = read_config(file)?;
                let diags = provider.validate_data_source_config(type_name, &config)?;
                report(&diags, file)?;
                writeln!(out, "{} is valid", file.display())?;
            }
            Self::Render { type_name, file } => {
                let config = read_config(file)?;
                let response = provider.read_data_source(type_name, config)?;
                report(&response.diagnostics, file)?;
                match response.yaml() {
                    Some(yaml) => write!(out, "{}", yaml)?,
                    None => bail!("no manifest rendered for {}", file.display()),
                }
            }
        }
        Ok(())
    }
}

fn read_config(file: &Path) -> Result<Value> {
    let input =
        read_to_string(file).with_context(|| format!("unable to read {}", file.display()))?;
    parse_config(&input).with_context(|| format!("unable to parse {}", file.display()))
}

/// print diagnostics, fail if any is an error
fn report(diags: &Diagnostics, file: &Path) -> Result<()> {
    for diag in diags.iter() {
        eprintln!("{}", diag);
    }
    let errors = diags.errors().count();
    if errors > 0 {
        bail!("{} has {} error(s)", file.display(), errors);
    }
    Ok(())
}

#[cfg(test)]
mod test {

    use std::path::PathBuf;

    use k8_manifest_provider::Provider;

    use super::Command;
    use super::OutputFormat;

    const ISSUER: &str = "k8s_cert_manager_io_cluster_issuer_v1_manifest";

    fn run(command: Command) -> anyhow::Result<String> {
        let provider = Provider::default();
        let mut out = Vec::new();
        command.execute(&provider, &mut out)?;
        Ok(String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn test_list() {
        let output = run(Command::List).expect("list");
        assert_eq!(output.lines().count(), 4);
        assert!(output.contains(ISSUER));
    }

    #[test]
    fn test_render() {
        //given
        let command = Command::Render {
            type_name: ISSUER.to_owned(),
            file: PathBuf::from("data/issuer.yaml"),
        };

        //when
        let output = run(command).expect("render");

        //then
        assert_eq!(
            output,
            "apiVersion: cert-manager.io/v1\nkind: ClusterIssuer\nmetadata:\n  name: self-signed\nspec:\n  selfSigned: {}\n"
        );
    }

    #[test]
    fn test_validate_reports_errors() {
        let err = run(Command::Validate {
            type_name: ISSUER.to_owned(),
            file: PathBuf::from("data/invalid-issuer.yaml"),
        })
        .expect_err("invalid");
        assert_eq!(err.to_string(), "data/invalid-issuer.yaml has 2 error(s)");

        let output = run(Command::Validate {
            type_name: ISSUER.to_owned(),
            file: PathBuf::from("data/issuer.yaml"),
        })
        .expect("valid");
        assert_eq!(output, "data/issuer.yaml is valid\n");
    }

    #[test]
    fn test_schema_json() {
        let output = run(Command::Schema {
            type_name: Some(ISSUER.to_owned()),
            output: OutputFormat::Json,
        })
        .expect("schema");
        let schema: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(schema["attributes"]["yaml"]["mode"], "computed");

        assert!(run(Command::Schema {
            type_name: Some("k8s_widget_v1_manifest".to_owned()),
            output: OutputFormat::Yaml,
        })
        .is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = run(Command::Render {
            type_name: ISSUER.to_owned(),
            file: PathBuf::from("data/missing.yaml"),
        })
        .expect_err("missing");
        assert_eq!(err.to_string(), "unable to read data/missing.yaml");
    }
}
