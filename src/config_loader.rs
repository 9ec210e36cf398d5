use crate::config::Config;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);
    read_config(config_path)
}

/// Parse and validate a YAML configuration without logging, for callers
/// that need the configured log level before the logger exists.
pub fn read_config(config_path: &Path) -> Result<Config> {
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;
    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub shape: Option<String>,
    pub total_nodes: Option<usize>,
    pub producer_nodes: Option<usize>,
    pub producers: Option<usize>,
    pub shared_producers: Option<usize>,
    pub unstarted_nodes: Option<usize>,
    pub genesis: Option<PathBuf>,
    pub max_block_cpu_usage: Option<u32>,
    pub max_transaction_cpu_usage: Option<u32>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) -> Result<()> {
    let network = &mut config.network;
    if let Some(shape) = &overrides.shape {
        info!("Shape override: {}", shape);
        network.shape = shape.clone();
    }
    if let Some(total) = overrides.total_nodes {
        network.total_nodes = total;
    }
    if let Some(pnodes) = overrides.producer_nodes {
        network.producer_nodes = pnodes;
    }
    if let Some(producers) = overrides.producers {
        network.producers = producers;
    }
    if let Some(shared) = overrides.shared_producers {
        network.shared_producers = shared;
    }
    if let Some(unstarted) = overrides.unstarted_nodes {
        network.unstarted_nodes = unstarted;
    }

    let genesis = &mut config.genesis;
    if let Some(path) = &overrides.genesis {
        genesis.path = Some(path.clone());
    }
    if let Some(cpu) = overrides.max_block_cpu_usage {
        genesis.max_block_cpu_usage = Some(cpu);
    }
    if let Some(cpu) = overrides.max_transaction_cpu_usage {
        genesis.max_transaction_cpu_usage = Some(cpu);
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
