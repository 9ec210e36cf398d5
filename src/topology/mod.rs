//! Network topology module.
//!
//! This module contains the shape definitions, the peer graph algorithms
//! for each builtin shape, and the topology file format shared by the
//! custom shape and downstream tooling.

pub mod bridge;
pub mod connections;
pub mod custom;
pub mod file;
pub mod types;

// Re-export key types and functions for easier access
pub use bridge::{classify_bridge_nodes, BridgeGroups};
pub use connections::{connect_nodes, star_gap, star_links};
pub use custom::nodes_from_file;
pub use file::{NodeDescription, TopologyFile};
pub use types::Shape;
