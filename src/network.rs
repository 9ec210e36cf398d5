//! Network description produced by a construction run.
//!
//! A `NetworkDescriptor` owns every node record plus the genesis and is
//! read-only once built. It is what the launcher side consumes, either
//! directly or through the serialized topology file.

use std::path::Path;

use color_eyre::Result;

use crate::error::TopologyError;
use crate::genesis::Genesis;
use crate::node::{NodeRecord, BIOS_NAME};
use crate::producer::ProducerAssignment;
use crate::topology::TopologyFile;

/// A fully built network: named nodes in creation order plus genesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDescriptor {
    name: String,
    nodes: Vec<NodeRecord>,
    genesis: Genesis,
}

impl NetworkDescriptor {
    pub fn new(name: impl Into<String>, nodes: Vec<NodeRecord>, genesis: Genesis) -> Self {
        NetworkDescriptor {
            name: name.into(),
            nodes,
            genesis,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_by_index(&self, index: i32) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.index == index)
    }

    pub fn bios(&self) -> Option<&NodeRecord> {
        self.node(BIOS_NAME)
    }

    pub fn genesis(&self) -> &Genesis {
        &self.genesis
    }

    /// Producer to owning node index for every unique producer.
    pub fn producer_assignment(&self) -> Result<ProducerAssignment, TopologyError> {
        ProducerAssignment::from_nodes(&self.nodes)
    }

    /// Nodes the launcher should actually start.
    pub fn started_nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.iter().filter(|n| !n.dont_start)
    }

    pub fn to_topology_file(&self) -> TopologyFile {
        TopologyFile::from_nodes(&self.name, &self.nodes)
    }

    /// Topology JSON, byte-identical for identical networks.
    pub fn to_json(&self) -> serde_json::Result<String> {
        self.to_topology_file().to_json()
    }

    pub fn write_topology(&self, path: &Path) -> Result<()> {
        self.to_topology_file().write(path)
    }
}
