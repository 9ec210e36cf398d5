//! Topology file format.
//!
//! A topology file is a JSON object holding the network name and an ordered
//! list of `[name, description]` pairs. It is written for downstream tooling
//! and read back by the custom shape, so field names and pair order must
//! survive a round trip unchanged.

use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::node::{KeyPair, NodeRecord};

/// Serialized form of a whole network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyFile {
    pub name: String,
    pub nodes: Vec<(String, NodeDescription)>,
}

/// Serialized form of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i32>,
    #[serde(default)]
    pub peers: Vec<String>,
    #[serde(default)]
    pub producers: Vec<String>,
    #[serde(default)]
    pub dont_start: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_port: Option<u16>,
    #[serde(default)]
    pub keys: Vec<KeyPair>,
}

impl From<&NodeRecord> for NodeDescription {
    fn from(node: &NodeRecord) -> Self {
        NodeDescription {
            index: Some(node.index),
            peers: node.peers.clone(),
            producers: node.producers.clone(),
            dont_start: node.dont_start,
            p2p_port: Some(node.p2p_port),
            http_port: Some(node.http_port),
            keys: node.keys.clone(),
        }
    }
}

impl TopologyFile {
    pub fn from_nodes(name: &str, nodes: &[NodeRecord]) -> Self {
        TopologyFile {
            name: name.to_string(),
            nodes: nodes
                .iter()
                .map(|node| (node.name.clone(), NodeDescription::from(node)))
                .collect(),
        }
    }

    /// Pretty-printed JSON, identical for identical networks.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and parse a topology file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read topology file '{}'", path.display()))?;
        Self::from_json(&content)
            .wrap_err_with(|| format!("Failed to parse topology file '{}'", path.display()))
    }

    /// Write the file, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
        let json = self.to_json().wrap_err("Failed to serialize topology")?;
        fs::write(path, json)
            .wrap_err_with(|| format!("Failed to write topology file '{}'", path.display()))
    }
}
