use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::genesis::GenesisOverrides;
use crate::node::ports::{BIOS_PORT_OFFSET, DEFAULT_HTTP_BASE, DEFAULT_P2P_BASE};
use crate::producer::BindingPlan;

/// Cluster generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub genesis: GenesisConfig,
    #[serde(default)]
    pub nodes: NodeArgsConfig,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.general.name.is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "name cannot be empty".to_string(),
            ));
        }

        let network = &self.network;
        if network.shape.trim().is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "shape cannot be empty".to_string(),
            ));
        }
        Self::validate_port_base("p2p_base_port", network.p2p_base_port, network.total_nodes)?;
        Self::validate_port_base("http_base_port", network.http_base_port, network.total_nodes)?;

        if let Some(cpu) = self.genesis.max_block_cpu_usage {
            if cpu == 0 {
                return Err(ValidationError::InvalidGenesis(
                    "max_block_cpu_usage must be greater than 0".to_string(),
                ));
            }
        }
        if let Some(cpu) = self.genesis.max_transaction_cpu_usage {
            if cpu == 0 {
                return Err(ValidationError::InvalidGenesis(
                    "max_transaction_cpu_usage must be greater than 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Port bases must leave room below for bios and above for every node
    fn validate_port_base(field: &str, base: u16, total_nodes: usize) -> Result<(), ValidationError> {
        if base < BIOS_PORT_OFFSET {
            return Err(ValidationError::InvalidNetwork(format!(
                "{} {} leaves no room for the bios port (must be at least {})",
                field, base, BIOS_PORT_OFFSET
            )));
        }
        if base as usize + total_nodes > u16::MAX as usize {
            return Err(ValidationError::InvalidNetwork(format!(
                "{} {} cannot fit {} nodes",
                field, base, total_nodes
            )));
        }
        Ok(())
    }

    /// Node and producer counts for binding
    pub fn binding_plan(&self) -> BindingPlan {
        BindingPlan {
            total_nodes: self.network.total_nodes,
            producer_nodes: self.network.producer_nodes,
            producers: self.network.producers,
            shared_producers: self.network.shared_producers,
            unstarted_nodes: self.network.unstarted_nodes,
        }
    }

    /// Genesis overrides taken from the configuration
    pub fn genesis_overrides(&self) -> GenesisOverrides {
        GenesisOverrides {
            max_block_cpu_usage: self.genesis.max_block_cpu_usage,
            max_transaction_cpu_usage: self.genesis.max_transaction_cpu_usage,
            initial_timestamp: self.genesis.initial_timestamp.clone(),
        }
    }
}

/// Shared general configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Network name prefix
    pub name: String,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Shape and counts of the network
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// line, ring, star, mesh, bridge, or a topology file path
    pub shape: String,
    /// All nodes, bios included
    pub total_nodes: usize,
    /// Producing nodes, bios included
    pub producer_nodes: usize,
    pub producers: usize,
    pub shared_producers: usize,
    pub unstarted_nodes: usize,
    pub p2p_base_port: u16,
    pub http_base_port: u16,
}

/// Genesis source and overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_block_cpu_usage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_transaction_cpu_usage: Option<u32>,
}

/// Extra node arguments
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeArgsConfig {
    /// Appended to every node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_args: Option<String>,
    /// Appended to one node, keyed by index (bios is -100)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub specific_args: BTreeMap<i32, String>,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid genesis configuration: {0}")]
    InvalidGenesis(String),
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            name: "testnet_".to_string(),
            config_dir: PathBuf::from("etc/eosio/launcher"),
            data_dir: PathBuf::from("var/lib"),
            log_level: Some("info".to_string()),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            shape: "mesh".to_string(),
            total_nodes: 2,
            producer_nodes: 2,
            producers: 21,
            shared_producers: 0,
            unstarted_nodes: 0,
            p2p_base_port: DEFAULT_P2P_BASE,
            http_base_port: DEFAULT_HTTP_BASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parsing() {
        let yaml = r#"
general:
  name: "bridge_"
  data_dir: "/tmp/cluster/data"
network:
  shape: "bridge"
  total_nodes: 4
  producer_nodes: 3
  producers: 21
genesis:
  max_block_cpu_usage: 500000
nodes:
  extra_args: "--verbose"
  specific_args:
    -100: "--bios-only"
    1: "--max-clients 2"
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.name, "bridge_");
        assert_eq!(config.general.config_dir, PathBuf::from("etc/eosio/launcher"));
        assert_eq!(config.network.shape, "bridge");
        assert_eq!(config.network.p2p_base_port, DEFAULT_P2P_BASE);
        assert_eq!(config.nodes.specific_args.get(&-100).unwrap(), "--bios-only");

        let plan = config.binding_plan();
        assert_eq!(plan.total_nodes, 4);
        assert_eq!(plan.producing_regular_nodes(), 2);
        assert_eq!(config.genesis_overrides().max_block_cpu_usage, Some(500_000));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.network.shape, "mesh");
        assert_eq!(config.network.total_nodes, 2);
        assert_eq!(config.binding_plan().validate(), Ok(()));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.general.name.clear();
        assert!(config.validate().unwrap_err().to_string().contains("name cannot be empty"));

        let mut config = Config::default();
        config.network.p2p_base_port = 50;
        assert!(config.validate().unwrap_err().to_string().contains("no room for the bios port"));

        let mut config = Config::default();
        config.network.http_base_port = 65_500;
        config.network.total_nodes = 100;
        assert!(config.validate().unwrap_err().to_string().contains("cannot fit 100 nodes"));

        let mut config = Config::default();
        config.genesis.max_transaction_cpu_usage = Some(0);
        assert!(config.validate().is_err());
    }
}
