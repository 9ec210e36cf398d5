//! Network construction orchestrator.
//!
//! This module coordinates one construction run: count validation, node
//! creation with a fresh port allocator, producer binding, peer graph
//! generation (or custom file loading), genesis composition, and finally
//! writing the generated files.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::info;

use crate::config::Config;
use crate::error::TopologyError;
use crate::genesis::compose_genesis;
use crate::launch::{compose_launch_plan, LaunchOptions, NodeLaunch};
use crate::network::NetworkDescriptor;
use crate::node::{DevKeys, KeySource, NodeFactory, NodeRecord, PortAllocator, BIOS_NAME};
use crate::producer::{bind_producers, BindingPlan};
use crate::topology::{connect_nodes, nodes_from_file, Shape, TopologyFile};
use crate::utils::validation::{validate_peer_graph, validate_shape_config};

/// Name of the topology file written to the output directory
pub const TOPOLOGY_FILE: &str = "topology.json";
/// Name of the genesis file written to the output directory
pub const GENESIS_FILE: &str = "genesis.json";
/// Name of the launch plan written to the output directory
pub const LAUNCH_PLAN_FILE: &str = "launch_plan.json";

/// Paths of the files written by [`generate_cluster_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub topology: PathBuf,
    pub genesis: PathBuf,
    pub launch_plan: PathBuf,
}

/// Build the network described by `config` with development keys.
pub fn build_network(config: &Config) -> Result<NetworkDescriptor> {
    build_network_with_keys(config, &mut DevKeys)
}

/// Build the network described by `config`, taking key pairs from `keys`.
///
/// Either the whole network is built or an error is returned; nothing is
/// written to disk.
pub fn build_network_with_keys(
    config: &Config,
    keys: &mut dyn KeySource,
) -> Result<NetworkDescriptor> {
    config.validate()?;
    let shape = Shape::resolve(&config.network.shape)?;
    let plan = config.binding_plan();

    let factory = NodeFactory::new(
        &config.general.config_dir,
        &config.general.data_dir,
        plan.total_nodes,
        plan.unstarted_nodes,
    );
    let mut ports = PortAllocator::new(config.network.p2p_base_port, config.network.http_base_port);

    let nodes = match &shape {
        Shape::Custom(path) => {
            info!("Loading custom topology from {}", path.display());
            let file = TopologyFile::load(path)?;
            nodes_from_file(&file, path, &factory, &mut ports)?
        }
        _ => {
            plan.validate()?;
            validate_shape_config(&shape, &plan)
                .map_err(|e| eyre!("Invalid {} topology: {}", shape, e))?;
            generate_nodes(&factory, &mut ports, &shape, &plan, keys)?
        }
    };

    validate_peer_graph(&nodes).map_err(|e| eyre!("Generated peer graph is invalid: {}", e))?;

    let bios = nodes
        .iter()
        .find(|n| n.name == BIOS_NAME)
        .ok_or_else(|| eyre!("Network has no bios node"))?;
    let genesis = compose_genesis(
        config.genesis.path.as_deref(),
        bios,
        &config.genesis_overrides(),
    )?;

    info!(
        "Built network '{}' as {} with {} nodes",
        config.general.name,
        shape,
        nodes.len()
    );
    Ok(NetworkDescriptor::new(config.general.name.clone(), nodes, genesis))
}

fn generate_nodes(
    factory: &NodeFactory,
    ports: &mut PortAllocator,
    shape: &Shape,
    plan: &BindingPlan,
    keys: &mut dyn KeySource,
) -> Result<Vec<NodeRecord>, TopologyError> {
    let mut nodes: Vec<NodeRecord> = (0..plan.total_nodes)
        .map(|position| factory.create(position, position == 0, ports))
        .collect();
    bind_producers(&mut nodes, plan, keys)?;
    connect_nodes(&mut nodes, shape, plan.producers)?;
    Ok(nodes)
}

/// Launch options for a network whose files live in `output_dir`.
pub fn launch_options(config: &Config, output_dir: &Path) -> LaunchOptions {
    LaunchOptions {
        genesis_path: output_dir.join(GENESIS_FILE),
        extra_args: config.nodes.extra_args.clone(),
        specific_args: config.nodes.specific_args.clone(),
    }
}

/// Build the network and write topology, genesis and launch plan files
/// into `output_dir`.
pub fn generate_cluster_files(config: &Config, output_dir: &Path) -> Result<GeneratedFiles> {
    let network = build_network(config)?;
    let options = launch_options(config, output_dir);
    let plan: Vec<NodeLaunch> = compose_launch_plan(&network, &options)?;

    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let files = GeneratedFiles {
        topology: output_dir.join(TOPOLOGY_FILE),
        genesis: options.genesis_path.clone(),
        launch_plan: output_dir.join(LAUNCH_PLAN_FILE),
    };

    network.write_topology(&files.topology)?;
    network.genesis().write(&files.genesis)?;
    let plan_json = serde_json::to_string_pretty(&plan).wrap_err("Failed to serialize launch plan")?;
    fs::write(&files.launch_plan, plan_json)
        .wrap_err_with(|| format!("Failed to write launch plan '{}'", files.launch_plan.display()))?;

    info!(
        "Wrote {} ({} node(s), {} to start)",
        files.topology.display(),
        network.nodes().len(),
        network.started_nodes().count()
    );
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::KeyPair;

    fn config(shape: &str, total: usize, pnodes: usize, producers: usize) -> Config {
        let mut config = Config::default();
        config.network.shape = shape.to_string();
        config.network.total_nodes = total;
        config.network.producer_nodes = pnodes;
        config.network.producers = producers;
        config
    }

    struct CountingKeys(usize);

    impl KeySource for CountingKeys {
        fn key_pair(&mut self, node_name: &str) -> KeyPair {
            self.0 += 1;
            KeyPair::new(format!("PUB_{}", node_name), format!("PRIV_{}", self.0))
        }
    }

    #[test]
    fn test_build_mesh() {
        let network = build_network(&config("mesh", 4, 3, 4)).unwrap();
        assert_eq!(network.nodes().len(), 4);
        assert_eq!(network.genesis().initial_key, crate::node::keys::DEV_PUBLIC_KEY);
    }

    #[test]
    fn test_genesis_uses_injected_bios_key() {
        let mut keys = CountingKeys(0);
        let network = build_network_with_keys(&config("line", 3, 2, 2), &mut keys).unwrap();
        assert_eq!(network.genesis().initial_key, "PUB_bios");
        assert_eq!(keys.0, 2);
    }

    #[test]
    fn test_configuration_errors_are_fatal() {
        let err = build_network(&config("hexagon", 4, 3, 4)).unwrap_err();
        assert!(err.to_string().contains("unknown topology shape"));

        let err = build_network(&config("mesh", 3, 4, 4)).unwrap_err();
        assert!(err.to_string().contains("exceeds total node count"));

        let err = build_network(&config("bridge", 3, 3, 4)).unwrap_err();
        assert!(err.to_string().contains("Invalid bridge topology"));
    }

    #[test]
    fn test_generate_cluster_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = generate_cluster_files(&config("ring", 4, 3, 4), dir.path()).unwrap();
        assert!(files.topology.exists());
        assert!(files.genesis.exists());
        assert!(files.launch_plan.exists());

        let plan: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.launch_plan).unwrap()).unwrap();
        assert_eq!(plan.as_array().unwrap().len(), 4);
        assert_eq!(plan[0]["name"], "bios");
    }
}
