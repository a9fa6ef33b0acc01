//! vagrant-inventory
//!
//! Ansible dynamic inventory script for the Vagrant-managed Kubernetes lab.
//! Prints JSON on stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use color_eyre::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vagrant_inventory_core::{InventoryRunner, RunMode, base_inventory};
use vagrant_inventory_exec::LocalExecutor;
use vagrant_inventory_vagrant::VagrantCli;

mod config;

use config::Config;

/// Ansible dynamic inventory for the Vagrant k8s lab
#[derive(Parser, Debug)]
#[command(name = "vagrant-inventory", version, about, long_about = None)]
struct Args {
    /// Print the whole inventory
    #[arg(long)]
    list: bool,

    /// Print the variables of one host
    #[arg(long, value_name = "HOSTNAME")]
    host: Option<String>,

    /// Skip checking the running machines against the declared topology;
    /// a bare `--dry-run` turns the check on
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        default_missing_value = "false",
        num_args = 0..=1,
        action = ArgAction::Set
    )]
    dry_run: bool,

    /// Configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();
    let mode = RunMode::from_flags(args.list, args.host)?;

    let (config, config_path) = Config::load_default(args.config.as_deref())?;
    init_tracing(&config.log_level);
    match &config_path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => info!("no config file found, using defaults"),
    }

    let base = base_inventory()?.merge_meta_info(&config.extra_meta()?, false)?;

    let mut executor = LocalExecutor::new();
    if let Some(dir) = &config.vagrant.working_dir {
        executor = executor.with_current_dir(dir);
    }
    let gateway = VagrantCli::new(Arc::new(executor))
        .with_binary(&config.vagrant.binary)
        .with_timeout(config.vagrant.timeout());

    let runner = InventoryRunner::new(Arc::new(gateway), base).with_liveness_check(!args.dry_run);
    let output = runner.run(&mode).await?;

    println!("{}", output.to_json()?);
    Ok(())
}

/// Log to stderr, `RUST_LOG` taking precedence over the configured level
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
