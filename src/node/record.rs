//! Node identities and the factory that creates them.

use std::path::{Path, PathBuf};

use super::keys::KeyPair;
use super::ports::{NodePorts, PortAllocator};

/// Index reserved for the bios node.
pub const BIOS_INDEX: i32 = -100;
/// Name of the bios node.
pub const BIOS_NAME: &str = "bios";

/// Name of the regular node with the given ordinal: `node_00`, `node_01`, ...
pub fn node_name(ordinal: usize) -> String {
    format!("node_{:02}", ordinal)
}

/// One node of the network being described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// `BIOS_INDEX` for bios, `0..N-1` otherwise
    pub index: i32,
    pub name: String,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
    /// Producer accounts owned by this node, in binding order
    pub producers: Vec<String>,
    /// Node names this node dials, insertion ordered and duplicate free
    pub peers: Vec<String>,
    pub p2p_port: u16,
    pub http_port: u16,
    pub dont_start: bool,
    pub keys: Vec<KeyPair>,
}

impl NodeRecord {
    pub fn is_bios(&self) -> bool {
        self.index == BIOS_INDEX
    }

    /// Adds `peer` unless it is this node or already present.
    /// Returns true when the peer set changed.
    pub fn add_peer(&mut self, peer: &str) -> bool {
        if peer == self.name || self.has_peer(peer) {
            return false;
        }
        self.peers.push(peer.to_string());
        true
    }

    pub fn has_peer(&self, peer: &str) -> bool {
        self.peers.iter().any(|p| p == peer)
    }

    pub fn is_producing(&self) -> bool {
        !self.producers.is_empty()
    }

    pub fn ports(&self) -> NodePorts {
        NodePorts {
            p2p: self.p2p_port,
            http: self.http_port,
        }
    }

    /// First public key, used to seed genesis when this is bios.
    pub fn first_public_key(&self) -> Option<&str> {
        self.keys.first().map(|k| k.public_key.as_str())
    }
}

/// Builds node records for one network construction.
#[derive(Debug, Clone)]
pub struct NodeFactory {
    config_dir: PathBuf,
    data_dir: PathBuf,
    total_nodes: usize,
    unstarted_nodes: usize,
}

impl NodeFactory {
    pub fn new(
        config_dir: &Path,
        data_dir: &Path,
        total_nodes: usize,
        unstarted_nodes: usize,
    ) -> Self {
        NodeFactory {
            config_dir: config_dir.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
            total_nodes,
            unstarted_nodes,
        }
    }

    /// Creates the node at sequential `position` (bios occupies position 0).
    ///
    /// Regular nodes are named after `position - 1`. Nodes whose position
    /// falls in the trailing `unstarted_nodes` slice are marked
    /// `dont_start`.
    pub fn create(&self, position: usize, is_bios: bool, ports: &mut PortAllocator) -> NodeRecord {
        let (index, name, assigned) = if is_bios {
            (BIOS_INDEX, BIOS_NAME.to_string(), ports.bios_ports())
        } else {
            let ordinal = position.saturating_sub(1);
            (ordinal as i32, node_name(ordinal), ports.next_pair())
        };
        let dont_start = !is_bios && self.is_unstarted(position);
        log::debug!(
            "Created node {} (index {}, p2p {}, http {}{})",
            name,
            index,
            assigned.p2p,
            assigned.http,
            if dont_start { ", not started" } else { "" }
        );

        NodeRecord {
            index,
            config_dir: self.config_dir.join(&name),
            data_dir: self.data_dir.join(&name),
            name,
            producers: Vec::new(),
            peers: Vec::new(),
            p2p_port: assigned.p2p,
            http_port: assigned.http,
            dont_start,
            keys: Vec::new(),
        }
    }

    /// True when sequential `position` is in the unstarted tail.
    pub fn is_unstarted(&self, position: usize) -> bool {
        position >= self.total_nodes.saturating_sub(self.unstarted_nodes)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
