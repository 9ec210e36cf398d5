//! Node identity module.
//!
//! Node records, their signing credentials and the per-construction port
//! allocator.

pub mod keys;
pub mod ports;
pub mod record;

pub use keys::{DevKeys, KeyPair, KeySource};
pub use ports::{NodePorts, PortAllocator};
pub use record::{node_name, NodeFactory, NodeRecord, BIOS_INDEX, BIOS_NAME};
