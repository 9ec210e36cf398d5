//! Configuration validation utilities.
//!
//! This module provides validation functions for shape/count combinations,
//! account names and generated peer graphs.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::node::NodeRecord;
use crate::producer::BindingPlan;
use crate::topology::Shape;

/// Largest mesh generated without a warning.
const MESH_WARN_NODES: usize = 50;

fn account_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z1-5.]{1,12}$").expect("account name pattern is valid"))
}

/// Returns true if `name` is a usable on-chain account name.
///
/// # Examples
/// ```
/// use clustergen::utils::validation::is_valid_account_name;
///
/// assert!(is_valid_account_name("defproducera"));
/// assert!(!is_valid_account_name("DefProducer"));
/// assert!(!is_valid_account_name("toolongaccountname"));
/// ```
pub fn is_valid_account_name(name: &str) -> bool {
    account_name_regex().is_match(name) && !name.ends_with('.')
}

/// Validate that a builtin shape makes sense for the requested counts
///
/// - Bridge topology: requires at least two producing nodes besides bios
///   and at least one node left over to act as a bridge
/// - Mesh topology: allowed at any size, warns above 50 nodes
/// - Custom topologies ignore the counts entirely
///
/// # Arguments
/// * `shape` - The shape to validate
/// * `plan` - The requested node and producer counts
///
/// # Returns
/// * `Ok(())` if validation succeeds
/// * `Err(String)` with an error message if validation fails
pub fn validate_shape_config(shape: &Shape, plan: &BindingPlan) -> Result<(), String> {
    match shape {
        Shape::Bridge => {
            if plan.producing_regular_nodes() < 2 {
                return Err(format!(
                    "Bridge topology requires at least 3 producer nodes (bios included), got {}",
                    plan.producer_nodes
                ));
            }
            if plan.total_nodes <= plan.producer_nodes {
                return Err(format!(
                    "Bridge topology requires total nodes ({}) to exceed producer nodes ({})",
                    plan.total_nodes, plan.producer_nodes
                ));
            }
        }
        Shape::Mesh => {
            if plan.total_nodes > MESH_WARN_NODES {
                log::warn!(
                    "Mesh topology with {} nodes creates {} connections",
                    plan.total_nodes,
                    (plan.total_nodes - 1) * (plan.total_nodes - 2)
                );
            }
        }
        Shape::Line | Shape::Ring | Shape::Star | Shape::Custom(_) => {}
    }
    Ok(())
}

/// Check that every peer named in the graph is a node of the graph and that
/// no node dials itself.
pub fn validate_peer_graph(nodes: &[NodeRecord]) -> Result<(), String> {
    let names: HashSet<&str> = nodes.iter().map(|n| n.name.as_str()).collect();
    for node in nodes {
        for peer in &node.peers {
            if peer == &node.name {
                return Err(format!("Node '{}' peers itself", node.name));
            }
            if !names.contains(peer.as_str()) {
                return Err(format!("Node '{}' peers unknown node '{}'", node.name, peer));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(total_nodes: usize, producer_nodes: usize) -> BindingPlan {
        BindingPlan {
            total_nodes,
            producer_nodes,
            producers: 21,
            shared_producers: 0,
            unstarted_nodes: 0,
        }
    }

    #[test]
    fn test_account_names() {
        assert!(is_valid_account_name("eosio"));
        assert!(is_valid_account_name("defpraaaaaab"));
        assert!(is_valid_account_name("shrproducerz"));
        assert!(is_valid_account_name("eosio.token"));
        assert!(!is_valid_account_name(""));
        assert!(!is_valid_account_name("node_00"));
        assert!(!is_valid_account_name("producer9"));
        assert!(!is_valid_account_name("trailing."));
    }

    #[test]
    fn test_bridge_shape_config() {
        assert!(validate_shape_config(&Shape::Bridge, &plan(4, 3)).is_ok());
        let err = validate_shape_config(&Shape::Bridge, &plan(4, 2)).unwrap_err();
        assert!(err.contains("at least 3 producer nodes"));
        let err = validate_shape_config(&Shape::Bridge, &plan(3, 3)).unwrap_err();
        assert!(err.contains("to exceed producer nodes"));
    }

    #[test]
    fn test_other_shapes_accept_counts() {
        assert!(validate_shape_config(&Shape::Mesh, &plan(80, 3)).is_ok());
        assert!(validate_shape_config(&Shape::Ring, &plan(2, 2)).is_ok());
        assert!(validate_shape_config(&Shape::Star, &plan(2, 2)).is_ok());
    }
}
