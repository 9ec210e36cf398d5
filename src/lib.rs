//! # Clustergen - Test cluster generator for ledger node test harnesses
//!
//! This library builds the complete description of a multi-node test
//! network: node identities and ports, producer assignments, the peer
//! adjacency graph and the chain genesis. The description is handed to a
//! launcher that starts the node binaries; process supervision, chain
//! queries and log analysis live outside this crate.
//!
//! ## Overview
//!
//! Given a node count, a producer count and a topology shape, the generator
//! deterministically produces the same network every time. A fresh port
//! allocator is used for every construction, so repeated builds in one
//! process never leak ports into each other.
//!
//! ## Shapes
//!
//! - **Line**: each node dials the next one
//! - **Ring**: a line closed back onto its first node
//! - **Star**: a bounded number of strided links per node for low diameter
//! - **Mesh**: every node dials every other node
//! - **Bridge**: two isolated producer groups joined only through bridge nodes
//! - **Custom**: any topology file previously written by this crate
//!
//! Regular nodes also dial the bios node, which bootstraps the chain. In the
//! bridge shape only the bridge nodes do, keeping the groups partitionable.
//!
//! ## Architecture
//!
//! - `config` / `config_loader`: YAML configuration and CLI overrides
//! - `node`: node records, key pairs and the port allocator
//! - `producer`: producer naming and distribution across nodes
//! - `topology`: shape algorithms and the topology file format
//! - `genesis`: genesis loading, defaults and overrides
//! - `network`: the assembled, read-only network description
//! - `launch`: per-node argument lists for the launcher
//! - `orchestrator`: one construction run end to end
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clustergen::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("cluster.yaml"))?;
//! let network = orchestrator::build_network(&config)?;
//! println!("{}", network.to_json()?);
//!
//! // Or write topology.json, genesis.json and launch_plan.json
//! orchestrator::generate_cluster_files(&config, Path::new("cluster_output"))?;
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   name: "testnet_"
//!   config_dir: "etc/eosio/launcher"
//!   data_dir: "var/lib"
//!
//! network:
//!   shape: "bridge"        # line/ring/star/mesh/bridge or a topology file
//!   total_nodes: 4         # bios included
//!   producer_nodes: 3      # bios included
//!   producers: 21
//!
//! genesis:
//!   max_block_cpu_usage: 500000
//!
//! nodes:
//!   specific_args:
//!     0: "--plugin eosio::net_api_plugin"
//! ```
//!
//! ## Error Handling
//!
//! Count and topology problems are reported as [`error::TopologyError`]
//! before anything is written. Operations touching the filesystem return
//! `color_eyre::Result` with context attached.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod genesis;
pub mod launch;
pub mod network;
pub mod node;
pub mod orchestrator;
pub mod producer;
pub mod topology;
pub mod utils;
