//! Genesis configuration.
//!
//! The genesis file is either loaded from disk or synthesized from the
//! default resource limits. In both cases `initial_key` is replaced with
//! the bios node's live public key and the command-line overrides are
//! applied on top.

use std::fs;
use std::path::Path;

use chrono::{NaiveDateTime, Utc};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::TopologyError;
use crate::node::NodeRecord;

/// Timestamp used when neither the file nor an override provides one.
pub const DEFAULT_INITIAL_TIMESTAMP: &str = "2018-06-01T12:00:00.000";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Chain genesis as consumed by the node binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis {
    #[serde(default = "default_timestamp")]
    pub initial_timestamp: String,
    #[serde(default)]
    pub initial_key: String,
    #[serde(default)]
    pub initial_configuration: InitialConfiguration,
    /// Fields this crate does not model, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_timestamp() -> String {
    DEFAULT_INITIAL_TIMESTAMP.to_string()
}

/// Resource limits of the initial chain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConfiguration {
    pub max_block_net_usage: u64,
    pub target_block_net_usage_pct: u32,
    pub max_transaction_net_usage: u32,
    pub base_per_transaction_net_usage: u32,
    pub net_usage_leeway: u32,
    pub context_free_discount_net_usage_num: u32,
    pub context_free_discount_net_usage_den: u32,
    pub max_block_cpu_usage: u32,
    pub target_block_cpu_usage_pct: u32,
    pub max_transaction_cpu_usage: u32,
    pub min_transaction_cpu_usage: u32,
    pub max_transaction_lifetime: u32,
    pub deferred_trx_expiration_window: u32,
    pub max_transaction_delay: u32,
    pub max_inline_action_size: u32,
    pub max_inline_action_depth: u16,
    pub max_authority_depth: u16,
}

impl Default for InitialConfiguration {
    fn default() -> Self {
        Self {
            max_block_net_usage: 1_048_576,
            target_block_net_usage_pct: 1000,
            max_transaction_net_usage: 524_288,
            base_per_transaction_net_usage: 12,
            net_usage_leeway: 500,
            context_free_discount_net_usage_num: 20,
            context_free_discount_net_usage_den: 100,
            max_block_cpu_usage: 200_000,
            target_block_cpu_usage_pct: 1000,
            max_transaction_cpu_usage: 150_000,
            min_transaction_cpu_usage: 100,
            max_transaction_lifetime: 3600,
            deferred_trx_expiration_window: 600,
            max_transaction_delay: 3_888_000,
            max_inline_action_size: 524_288,
            max_inline_action_depth: 4,
            max_authority_depth: 6,
        }
    }
}

impl Default for Genesis {
    fn default() -> Self {
        Self {
            initial_timestamp: default_timestamp(),
            initial_key: String::new(),
            initial_configuration: InitialConfiguration::default(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Values that take precedence over the loaded or default genesis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenesisOverrides {
    pub max_block_cpu_usage: Option<u32>,
    pub max_transaction_cpu_usage: Option<u32>,
    /// `now` or a `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp
    pub initial_timestamp: Option<String>,
}

impl Genesis {
    /// Read and parse a genesis file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read genesis file '{}'", path.display()))?;
        let genesis: Genesis = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse genesis file '{}'", path.display()))?;
        Ok(genesis)
    }

    /// Write the genesis as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).wrap_err("Failed to serialize genesis")?;
        fs::write(path, json)
            .wrap_err_with(|| format!("Failed to write genesis file '{}'", path.display()))
    }

    /// Apply overrides, normalising the timestamp to millisecond precision.
    pub fn apply_overrides(&mut self, overrides: &GenesisOverrides) -> Result<()> {
        if let Some(cpu) = overrides.max_block_cpu_usage {
            self.initial_configuration.max_block_cpu_usage = cpu;
        }
        if let Some(cpu) = overrides.max_transaction_cpu_usage {
            self.initial_configuration.max_transaction_cpu_usage = cpu;
        }
        let timestamp = match &overrides.initial_timestamp {
            Some(ts) if ts == "now" => Utc::now().naive_utc(),
            Some(ts) => parse_timestamp(ts)?,
            None => parse_timestamp(&self.initial_timestamp)?,
        };
        self.initial_timestamp = timestamp.format(TIMESTAMP_FORMAT).to_string();
        Ok(())
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| eyre!("Invalid genesis timestamp '{}': {}", value, e))
}

/// Build the genesis for a network whose bios node is `bios`.
pub fn compose_genesis(
    path: Option<&Path>,
    bios: &NodeRecord,
    overrides: &GenesisOverrides,
) -> Result<Genesis> {
    let mut genesis = match path {
        Some(path) if path.exists() => {
            info!("Loading genesis from {}", path.display());
            Genesis::load(path)?
        }
        Some(path) => {
            warn!("Genesis file {} does not exist, using defaults", path.display());
            Genesis::default()
        }
        None => Genesis::default(),
    };

    let key = bios.first_public_key().ok_or(TopologyError::BiosWithoutKey)?;
    genesis.initial_key = key.to_string();
    genesis.apply_overrides(overrides)?;
    Ok(genesis)
}
