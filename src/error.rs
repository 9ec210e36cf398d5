//! Error types for network construction.
//!
//! Every variant here is a configuration error: it is reported before any
//! node is launched and aborts the whole construction.

use std::path::PathBuf;

/// Configuration errors raised while building a network description.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("total node count must be at least 1")]
    NoNodes,
    #[error("producer node count {producer_nodes} exceeds total node count {total_nodes}")]
    TooManyProducerNodes {
        producer_nodes: usize,
        total_nodes: usize,
    },
    #[error("unable to allocate {producers} producers with only {producer_nodes} producing node(s) (bios included); at least 2 are required")]
    InsufficientProducerNodes {
        producers: usize,
        producer_nodes: usize,
    },
    #[error("{producers} producers cannot cover {non_bios} producing node(s); every producing node needs at least one")]
    TooFewProducers { producers: usize, non_bios: usize },
    #[error("unstarted node count {unstarted_nodes} must be below total node count {total_nodes}")]
    TooManyUnstarted {
        unstarted_nodes: usize,
        total_nodes: usize,
    },
    #[error("unknown topology shape '{0}' (not a builtin shape and no such file)")]
    UnknownShape(String),
    #[error("node '{node}' has producers in both bridge groups ({group_one} in group 1, {group_two} in group 2)")]
    StraddlingProducers {
        node: String,
        group_one: usize,
        group_two: usize,
    },
    #[error("bridge topology requires producing nodes in both groups (group 1: {group_one}, group 2: {group_two})")]
    EmptyBridgeGroup { group_one: usize, group_two: usize },
    #[error("bridge topology requires at least one non-producing bridge node")]
    NoBridgeNodes,
    #[error("topology file {0} does not define a 'bios' node")]
    MissingBios(PathBuf),
    #[error("node '{0}' is defined more than once")]
    DuplicateNode(String),
    #[error("node '{node}' peers unknown node '{peer}'")]
    UnknownPeer { node: String, peer: String },
    #[error("node '{0}' lists itself as a peer")]
    SelfPeer(String),
    #[error("producer '{producer}' is claimed by both '{first}' and '{second}'")]
    DuplicateProducer {
        producer: String,
        first: String,
        second: String,
    },
    #[error("port {port} is used by both '{first}' and '{second}'")]
    DuplicatePort {
        port: u16,
        first: String,
        second: String,
    },
    #[error("index {index} is used by both '{first}' and '{second}'")]
    DuplicateIndex {
        index: i32,
        first: String,
        second: String,
    },
    #[error("node '{0}' claims the bios index but is not bios")]
    ReservedIndex(String),
    #[error("invalid producer name '{0}'")]
    InvalidProducerName(String),
    #[error("no node with index {0} for specific arguments")]
    UnknownNodeIndex(i32),
    #[error("bios node has no key pair to seed genesis")]
    BiosWithoutKey,
}
