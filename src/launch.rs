//! Launch argument composition.
//!
//! Turns each node of a `NetworkDescriptor` into the argument list the node
//! binary is started with. Spawning the processes is left to the caller.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::TopologyError;
use crate::network::NetworkDescriptor;
use crate::node::NodeRecord;
use crate::utils::options::merge_args;

/// Inputs that are not part of the network itself.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Where the composed genesis file is written
    pub genesis_path: PathBuf,
    /// Appended to every node
    pub extra_args: Option<String>,
    /// Appended to a single node, keyed by node index (bios is -100)
    pub specific_args: BTreeMap<i32, String>,
}

/// Launch entry for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLaunch {
    pub name: String,
    pub index: i32,
    pub dont_start: bool,
    pub args: Vec<String>,
}

/// Compose launch entries for every node, in network order.
pub fn compose_launch_plan(
    network: &NetworkDescriptor,
    options: &LaunchOptions,
) -> Result<Vec<NodeLaunch>, TopologyError> {
    if let Some(&index) = options
        .specific_args
        .keys()
        .find(|&&index| network.node_by_index(index).is_none())
    {
        return Err(TopologyError::UnknownNodeIndex(index));
    }

    Ok(network
        .nodes()
        .iter()
        .map(|node| NodeLaunch {
            name: node.name.clone(),
            index: node.index,
            dont_start: node.dont_start,
            args: compose_node_args(network, node, options),
        })
        .collect())
}

/// Argument list for a single node.
pub fn compose_node_args(
    network: &NetworkDescriptor,
    node: &NodeRecord,
    options: &LaunchOptions,
) -> Vec<String> {
    let mut args = vec![
        "--config-dir".to_string(),
        node.config_dir.display().to_string(),
        "--data-dir".to_string(),
        node.data_dir.display().to_string(),
        "--p2p-listen-endpoint".to_string(),
        format!("0.0.0.0:{}", node.p2p_port),
        "--http-server-address".to_string(),
        format!("127.0.0.1:{}", node.http_port),
    ];

    for peer in &node.peers {
        match network.node(peer) {
            Some(peer_node) => {
                args.push("--p2p-peer-address".to_string());
                args.push(format!("localhost:{}", peer_node.p2p_port));
            }
            None => log::warn!("{} peers unknown node {}, skipping", node.name, peer),
        }
    }

    if node.is_producing() {
        args.push("--plugin".to_string());
        args.push("eosio::producer_plugin".to_string());
        for producer in &node.producers {
            args.push("--producer-name".to_string());
            args.push(producer.clone());
        }
        for key in &node.keys {
            args.push("--signature-provider".to_string());
            args.push(format!("{}=KEY:{}", key.public_key, key.private_key));
        }
    }

    if node.is_bios() {
        args.push("--enable-stale-production".to_string());
        args.push("--genesis-json".to_string());
        args.push(options.genesis_path.display().to_string());
    }
    args.push("--genesis-timestamp".to_string());
    args.push(network.genesis().initial_timestamp.clone());

    args.extend(merge_args(
        options.extra_args.as_deref(),
        &options.specific_args,
        node.index,
    ));
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::Genesis;
    use crate::node::{DevKeys, NodeFactory, PortAllocator};
    use crate::producer::{bind_producers, BindingPlan};
    use crate::topology::{connect_nodes, Shape};
    use std::path::Path;

    fn network() -> NetworkDescriptor {
        let plan = BindingPlan {
            total_nodes: 4,
            producer_nodes: 3,
            producers: 2,
            shared_producers: 0,
            unstarted_nodes: 1,
        };
        let factory = NodeFactory::new(Path::new("etc"), Path::new("var"), 4, 1);
        let mut ports = PortAllocator::default();
        let mut nodes: Vec<NodeRecord> = (0..4).map(|p| factory.create(p, p == 0, &mut ports)).collect();
        bind_producers(&mut nodes, &plan, &mut DevKeys).unwrap();
        connect_nodes(&mut nodes, &Shape::Line, plan.producers).unwrap();
        NetworkDescriptor::new("testnet_", nodes, Genesis::default())
    }

    fn options() -> LaunchOptions {
        LaunchOptions {
            genesis_path: PathBuf::from("out/genesis.json"),
            ..LaunchOptions::default()
        }
    }

    fn values_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
        args.windows(2)
            .filter(|w| w[0] == flag)
            .map(|w| w[1].as_str())
            .collect()
    }

    #[test]
    fn test_producer_node_args() {
        let network = network();
        let node = network.node("node_00").unwrap();
        let args = compose_node_args(&network, node, &options());
        assert_eq!(values_after(&args, "--p2p-peer-address"), vec!["localhost:9877", "localhost:9776"]);
        assert_eq!(values_after(&args, "--producer-name"), vec!["defproducera"]);
        assert_eq!(values_after(&args, "--plugin"), vec!["eosio::producer_plugin"]);
        assert_eq!(values_after(&args, "--signature-provider").len(), 1);
        assert!(!args.contains(&"--genesis-json".to_string()));
    }

    #[test]
    fn test_bios_args() {
        let network = network();
        let args = compose_node_args(&network, network.bios().unwrap(), &options());
        assert_eq!(values_after(&args, "--producer-name"), vec!["eosio"]);
        assert_eq!(values_after(&args, "--genesis-json"), vec!["out/genesis.json"]);
        assert!(args.contains(&"--enable-stale-production".to_string()));
        assert!(values_after(&args, "--p2p-peer-address").is_empty());
    }

    #[test]
    fn test_non_producer_args() {
        let network = network();
        let args = compose_node_args(&network, network.node("node_02").unwrap(), &options());
        assert!(!args.contains(&"--producer-name".to_string()));
        assert!(!args.contains(&"--signature-provider".to_string()));
        assert_eq!(values_after(&args, "--genesis-timestamp"), vec!["2018-06-01T12:00:00.000"]);
    }

    #[test]
    fn test_plan_with_extra_args() {
        let network = network();
        let mut opts = options();
        opts.extra_args = Some("--verbose".to_string());
        opts.specific_args.insert(1, "--max-clients 3".to_string());
        let plan = compose_launch_plan(&network, &opts).unwrap();
        assert_eq!(plan.len(), 4);
        assert!(plan[3].dont_start);
        assert_eq!(plan[2].args[plan[2].args.len() - 3..], ["--verbose", "--max-clients", "3"]);
        assert_eq!(plan[1].args.last().unwrap(), "--verbose");
    }

    #[test]
    fn test_plan_rejects_unknown_index() {
        let network = network();
        let mut opts = options();
        opts.specific_args.insert(7, "--x".to_string());
        assert_eq!(compose_launch_plan(&network, &opts), Err(TopologyError::UnknownNodeIndex(7)));
    }
}
