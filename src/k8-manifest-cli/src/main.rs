//! `k8s-manifest` command line tool.

use std::io::stdout;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use k8_manifest_provider::config::ProviderConfig;
use k8_manifest_provider::Provider;

mod commands;

use commands::Command;

/// Render Kubernetes custom resource manifests
#[derive(Parser, Debug)]
#[command(name = "k8s-manifest", version, about, long_about = None)]
struct Cli {
    /// Provider config file, defaults to $K8S_MANIFEST_CONFIG or ~/.k8s-manifest/config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn provider(&self) -> Result<Provider> {
        let config = match &self.config {
            Some(path) => ProviderConfig::from_file(path)?,
            None => ProviderConfig::load()?,
        };
        debug!(type_name = %config.type_name, groups = ?config.groups, "loaded config");
        Ok(Provider::from_config(&config)?)
    }
}

fn main() -> Result<()> {
    fluvio_future::subscriber::init_tracer(None);

    let cli = Cli::parse();
    let provider = cli.provider()?;
    cli.command.execute(&provider, &mut stdout().lock())
}
