//! Custom topologies loaded from a topology file.
//!
//! No algorithm runs here: nodes, peers, producers and start flags are taken
//! as written. The loader only fills in missing indices and ports and
//! rejects files that reference nodes they do not declare.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use log::info;

use crate::error::TopologyError;
use crate::node::{NodeFactory, NodeRecord, PortAllocator, BIOS_INDEX, BIOS_NAME};
use crate::producer::ProducerAssignment;
use crate::topology::file::TopologyFile;
use crate::utils::validation::is_valid_account_name;

/// Turn a parsed topology file into node records.
///
/// `source` is only used in error messages. Nodes without explicit ports get
/// them from `ports`; nodes without an index are numbered in declaration
/// order, bios always taking `BIOS_INDEX`.
pub fn nodes_from_file(
    file: &TopologyFile,
    source: &Path,
    factory: &NodeFactory,
    ports: &mut PortAllocator,
) -> Result<Vec<NodeRecord>, TopologyError> {
    validate_file(file, source)?;

    let mut next_index = 0i32;
    let mut nodes = Vec::with_capacity(file.nodes.len());
    for (name, desc) in &file.nodes {
        let is_bios = name == BIOS_NAME;
        let defaults = if is_bios { ports.bios_ports() } else { ports.next_pair() };
        let index = match (is_bios, desc.index) {
            (true, _) => BIOS_INDEX,
            (false, Some(index)) => index,
            (false, None) => next_index,
        };
        if !is_bios {
            next_index = index + 1;
        }

        nodes.push(NodeRecord {
            index,
            name: name.clone(),
            config_dir: factory.config_dir().join(name),
            data_dir: factory.data_dir().join(name),
            producers: desc.producers.clone(),
            peers: desc.peers.clone(),
            p2p_port: desc.p2p_port.unwrap_or(defaults.p2p),
            http_port: desc.http_port.unwrap_or(defaults.http),
            dont_start: desc.dont_start,
            keys: desc.keys.clone(),
        });
    }

    check_identities(&nodes)?;
    // Producers claimed by more than one node are a misconfiguration too
    ProducerAssignment::from_nodes(&nodes)?;
    info!("Loaded {} nodes from topology file {}", nodes.len(), source.display());
    Ok(nodes)
}

/// Indices and ports must stay unique once the loader has filled in the
/// gaps, and only bios may carry `BIOS_INDEX`. P2P and HTTP ports share one
/// namespace since every node binds on the same host.
fn check_identities(nodes: &[NodeRecord]) -> Result<(), TopologyError> {
    let mut indices: BTreeMap<i32, &str> = BTreeMap::new();
    let mut ports: BTreeMap<u16, &str> = BTreeMap::new();
    for node in nodes {
        if node.index == BIOS_INDEX && node.name != BIOS_NAME {
            return Err(TopologyError::ReservedIndex(node.name.clone()));
        }
        if let Some(first) = indices.insert(node.index, &node.name) {
            return Err(TopologyError::DuplicateIndex {
                index: node.index,
                first: first.to_string(),
                second: node.name.clone(),
            });
        }
        for port in [node.p2p_port, node.http_port] {
            if let Some(first) = ports.insert(port, &node.name) {
                return Err(TopologyError::DuplicatePort {
                    port,
                    first: first.to_string(),
                    second: node.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_file(file: &TopologyFile, source: &Path) -> Result<(), TopologyError> {
    let mut declared = HashSet::new();
    for (name, _) in &file.nodes {
        if !declared.insert(name.as_str()) {
            return Err(TopologyError::DuplicateNode(name.clone()));
        }
    }
    if !declared.contains(BIOS_NAME) {
        return Err(TopologyError::MissingBios(source.to_path_buf()));
    }

    for (name, desc) in &file.nodes {
        for peer in &desc.peers {
            if peer == name {
                return Err(TopologyError::SelfPeer(name.clone()));
            }
            if !declared.contains(peer.as_str()) {
                return Err(TopologyError::UnknownPeer {
                    node: name.clone(),
                    peer: peer.clone(),
                });
            }
        }
        if let Some(bad) = desc.producers.iter().find(|p| !is_valid_account_name(p)) {
            return Err(TopologyError::InvalidProducerName(bad.clone()));
        }
    }
    Ok(())
}
