//! Bridge topology.
//!
//! Producers are split into two halves by ordinal. The nodes owning the
//! first half form group 1, the rest group 2. Each group is fully meshed
//! internally, and non-producing bridge nodes are connected to every member
//! of both groups. No member of one group ever dials a member of the other,
//! and only the bridge nodes dial bios, so stopping the bridge nodes
//! partitions the producers.

use std::collections::HashSet;

use log::info;

use crate::error::TopologyError;
use crate::node::{NodeRecord, BIOS_NAME};
use crate::producer::{is_shared_producer, producer_name};
use crate::topology::connections::{link, mesh_within, regular_positions};

/// Node positions grouped by their role in a bridge topology.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BridgeGroups {
    pub group_one: Vec<usize>,
    pub group_two: Vec<usize>,
    pub bridges: Vec<usize>,
}

/// Sort regular nodes into the two producer groups and the bridge set.
pub fn classify_bridge_nodes(
    nodes: &[NodeRecord],
    producers: usize,
) -> Result<BridgeGroups, TopologyError> {
    let first_half: HashSet<String> = (0..producers.div_ceil(2))
        .map(|ordinal| producer_name(ordinal as u32, false))
        .collect();

    let mut groups = BridgeGroups::default();
    for pos in regular_positions(nodes) {
        let node = &nodes[pos];
        let owned: Vec<&String> = node
            .producers
            .iter()
            .filter(|p| !is_shared_producer(p))
            .collect();
        if owned.is_empty() {
            groups.bridges.push(pos);
            continue;
        }

        let in_first = owned.iter().filter(|p| first_half.contains(p.as_str())).count();
        let in_second = owned.len() - in_first;
        if in_first > 0 && in_second > 0 {
            return Err(TopologyError::StraddlingProducers {
                node: node.name.clone(),
                group_one: in_first,
                group_two: in_second,
            });
        }
        if in_first > 0 {
            groups.group_one.push(pos);
        } else {
            groups.group_two.push(pos);
        }
    }

    if groups.bridges.is_empty() {
        return Err(TopologyError::NoBridgeNodes);
    }
    if groups.group_one.is_empty() || groups.group_two.is_empty() {
        return Err(TopologyError::EmptyBridgeGroup {
            group_one: groups.group_one.len(),
            group_two: groups.group_two.len(),
        });
    }
    Ok(groups)
}

/// Build the bridge peer graph. Nothing is modified if classification fails.
pub fn make_bridge(nodes: &mut [NodeRecord], producers: usize) -> Result<(), TopologyError> {
    let groups = classify_bridge_nodes(nodes, producers)?;
    info!(
        "Bridge layout: {} node(s) in group 1, {} in group 2, {} bridge(s)",
        groups.group_one.len(),
        groups.group_two.len(),
        groups.bridges.len()
    );

    mesh_within(nodes, &groups.group_one);
    mesh_within(nodes, &groups.group_two);

    for &member in groups.group_one.iter().chain(groups.group_two.iter()) {
        for &bridge in &groups.bridges {
            link(nodes, member, bridge);
            link(nodes, bridge, member);
        }
    }

    // Bios reaches the groups only through the bridges
    if nodes.iter().any(|n| n.is_bios()) {
        for &bridge in &groups.bridges {
            nodes[bridge].add_peer(BIOS_NAME);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{DevKeys, NodeFactory, PortAllocator};
    use crate::producer::{bind_producers, BindingPlan};
    use crate::topology::{connect_nodes, Shape};
    use std::path::Path;

    fn bound(total: usize, pnodes: usize, producers: usize) -> Vec<NodeRecord> {
        let plan = BindingPlan {
            total_nodes: total,
            producer_nodes: pnodes,
            producers,
            shared_producers: 0,
            unstarted_nodes: 0,
        };
        let factory = NodeFactory::new(Path::new("etc"), Path::new("var"), total, 0);
        let mut ports = PortAllocator::default();
        let mut nodes: Vec<NodeRecord> =
            (0..total).map(|pos| factory.create(pos, pos == 0, &mut ports)).collect();
        bind_producers(&mut nodes, &plan, &mut DevKeys).unwrap();
        nodes
    }

    #[test]
    fn test_classify_split() {
        let nodes = bound(4, 3, 21);
        let groups = classify_bridge_nodes(&nodes, 21).unwrap();
        assert_eq!(groups.group_one, vec![1]);
        assert_eq!(groups.group_two, vec![2]);
        assert_eq!(groups.bridges, vec![3]);
    }

    #[test]
    fn test_groups_never_touch() {
        let mut nodes = bound(7, 5, 20);
        make_bridge(&mut nodes, 20).unwrap();
        let groups = classify_bridge_nodes(&nodes, 20).unwrap();
        for &a in &groups.group_one {
            for &b in &groups.group_two {
                assert!(!nodes[a].has_peer(&nodes[b].name));
                assert!(!nodes[b].has_peer(&nodes[a].name));
            }
        }
        for &bridge in &groups.bridges {
            for &member in groups.group_one.iter().chain(groups.group_two.iter()) {
                assert!(nodes[member].has_peer(&nodes[bridge].name));
                assert!(nodes[bridge].has_peer(&nodes[member].name));
            }
        }
    }

    #[test]
    fn test_only_bridges_dial_bios() {
        let mut nodes = bound(7, 3, 21);
        connect_nodes(&mut nodes, &Shape::Bridge, 21).unwrap();
        let groups = classify_bridge_nodes(&nodes, 21).unwrap();
        for &member in groups.group_one.iter().chain(groups.group_two.iter()) {
            assert!(!nodes[member].has_peer(BIOS_NAME), "{} dials bios", nodes[member].name);
        }
        for &bridge in &groups.bridges {
            assert!(nodes[bridge].has_peer(BIOS_NAME));
        }
        assert!(nodes[0].peers.is_empty());
    }

    #[test]
    fn test_straddling_node_rejected() {
        // 20 producers over 3 nodes: 7/7/6, the middle node owns ordinals 7..=13
        let mut nodes = bound(5, 4, 20);
        let before = nodes.clone();
        let err = make_bridge(&mut nodes, 20).unwrap_err();
        assert!(matches!(err, TopologyError::StraddlingProducers { ref node, .. } if node == "node_01"));
        assert_eq!(nodes, before);
    }

    #[test]
    fn test_bridge_requires_bridge_node() {
        let nodes = bound(3, 3, 4);
        assert_eq!(classify_bridge_nodes(&nodes, 4), Err(TopologyError::NoBridgeNodes));
    }

    #[test]
    fn test_bridge_requires_two_groups() {
        // With a pool of 8 the single producing node owns only first-half names
        let nodes = bound(3, 2, 4);
        assert!(matches!(
            classify_bridge_nodes(&nodes, 8),
            Err(TopologyError::EmptyBridgeGroup { group_one: 1, group_two: 0 })
        ));
    }
}
