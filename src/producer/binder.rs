//! Distribution of producer accounts across node records.
//!
//! The requested producers are spread over the first `producer_nodes - 1`
//! regular nodes. Each gets `producers / (producer_nodes - 1)` names and the
//! remainder goes one apiece to the leading nodes, so earlier nodes own the
//! alphabetically earlier producers and never fewer than later ones.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::error::TopologyError;
use crate::node::{KeySource, NodeRecord};
use super::names::{is_shared_producer, producer_name, SYSTEM_PRODUCER};

/// Counts that drive producer binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingPlan {
    /// All nodes, bios included
    pub total_nodes: usize,
    /// Producing nodes, bios included
    pub producer_nodes: usize,
    /// Unique producers to distribute
    pub producers: usize,
    /// Producers duplicated on every producing node
    pub shared_producers: usize,
    /// Trailing nodes configured but not started
    pub unstarted_nodes: usize,
}

impl BindingPlan {
    /// Check the counts for consistency.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.total_nodes == 0 {
            return Err(TopologyError::NoNodes);
        }
        if self.producer_nodes > self.total_nodes {
            return Err(TopologyError::TooManyProducerNodes {
                producer_nodes: self.producer_nodes,
                total_nodes: self.total_nodes,
            });
        }
        if self.unstarted_nodes >= self.total_nodes {
            return Err(TopologyError::TooManyUnstarted {
                unstarted_nodes: self.unstarted_nodes,
                total_nodes: self.total_nodes,
            });
        }
        if self.producers > 0 && self.producer_nodes < 2 {
            return Err(TopologyError::InsufficientProducerNodes {
                producers: self.producers,
                producer_nodes: self.producer_nodes,
            });
        }
        if self.producer_nodes >= 2 && self.producers < self.producing_regular_nodes() {
            return Err(TopologyError::TooFewProducers {
                producers: self.producers,
                non_bios: self.producing_regular_nodes(),
            });
        }
        Ok(())
    }

    /// Producing nodes other than bios.
    pub fn producing_regular_nodes(&self) -> usize {
        self.producer_nodes.saturating_sub(1)
    }
}

/// Maps each unique producer to the index of the node that owns it.
///
/// Shared producers and the system producer are not part of the pool and
/// are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProducerAssignment {
    owners: BTreeMap<String, i32>,
}

impl ProducerAssignment {
    /// Derive the assignment from bound nodes, rejecting producers that are
    /// claimed twice.
    pub fn from_nodes(nodes: &[NodeRecord]) -> Result<Self, TopologyError> {
        let mut owners: BTreeMap<String, i32> = BTreeMap::new();
        let mut owner_names: BTreeMap<&str, &str> = BTreeMap::new();
        for node in nodes {
            for producer in &node.producers {
                if producer == SYSTEM_PRODUCER || is_shared_producer(producer) {
                    continue;
                }
                if let Some(first) = owner_names.insert(producer.as_str(), node.name.as_str()) {
                    return Err(TopologyError::DuplicateProducer {
                        producer: producer.clone(),
                        first: first.to_string(),
                        second: node.name.clone(),
                    });
                }
                owners.insert(producer.clone(), node.index);
            }
        }
        Ok(ProducerAssignment { owners })
    }

    pub fn owner(&self, producer: &str) -> Option<i32> {
        self.owners.get(producer).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.owners.iter().map(|(name, &index)| (name.as_str(), index))
    }
}

/// Bind producers and keys to `nodes`, which must start with bios.
pub fn bind_producers(
    nodes: &mut [NodeRecord],
    plan: &BindingPlan,
    keys: &mut dyn KeySource,
) -> Result<ProducerAssignment, TopologyError> {
    plan.validate()?;

    let producing = plan.producing_regular_nodes();
    let per_node = if producing == 0 { 0 } else { plan.producers / producing };
    let mut extra = if producing == 0 { 0 } else { plan.producers % producing };
    let mut next_ordinal: u32 = 0;
    let mut regular = 0usize;

    for node in nodes.iter_mut() {
        if node.is_bios() {
            node.keys.push(keys.key_pair(&node.name));
            node.producers.push(SYSTEM_PRODUCER.to_string());
            continue;
        }

        if regular < producing {
            let mut count = per_node;
            if extra > 0 {
                count += 1;
                extra -= 1;
            }
            for _ in 0..count {
                node.producers.push(producer_name(next_ordinal, false));
                next_ordinal += 1;
            }
            for shared in 0..plan.shared_producers {
                node.producers.push(producer_name(shared as u32, true));
            }
            node.keys.push(keys.key_pair(&node.name));
            debug!("Bound {} producer(s) to {}: {:?}", node.producers.len(), node.name, node.producers);
        }
        regular += 1;
    }

    let assignment = ProducerAssignment::from_nodes(nodes)?;
    info!(
        "Bound {} producers ({} shared) across {} producing node(s)",
        assignment.len(),
        plan.shared_producers,
        producing
    );
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{DevKeys, NodeFactory, PortAllocator};
    use std::path::Path;

    fn nodes_for(plan: &BindingPlan) -> Vec<NodeRecord> {
        let factory = NodeFactory::new(Path::new("etc"), Path::new("var"), plan.total_nodes, plan.unstarted_nodes);
        let mut ports = PortAllocator::default();
        (0..plan.total_nodes)
            .map(|pos| factory.create(pos, pos == 0, &mut ports))
            .collect()
    }

    fn plan(total_nodes: usize, producer_nodes: usize, producers: usize, shared_producers: usize) -> BindingPlan {
        BindingPlan {
            total_nodes,
            producer_nodes,
            producers,
            shared_producers,
            unstarted_nodes: 0,
        }
    }

    fn bind(plan: &BindingPlan) -> (Vec<NodeRecord>, ProducerAssignment) {
        let mut nodes = nodes_for(plan);
        let assignment = bind_producers(&mut nodes, plan, &mut DevKeys).unwrap();
        (nodes, assignment)
    }

    #[test]
    fn test_front_loaded_remainder() {
        let (nodes, assignment) = bind(&plan(4, 3, 21, 0));
        assert_eq!(nodes[1].producers.len(), 11);
        assert_eq!(nodes[2].producers.len(), 10);
        assert!(nodes[3].producers.is_empty());
        assert_eq!(nodes[1].producers[0], "defproducera");
        assert_eq!(nodes[1].producers[10], "defproducerk");
        assert_eq!(nodes[2].producers[0], "defproducerl");
        assert_eq!(assignment.len(), 21);
        assert_eq!(assignment.owner("defproducerl"), Some(1));
    }

    #[test]
    fn test_counts_differ_by_at_most_one() {
        for producers in 4..60 {
            let p = plan(6, 5, producers, 0);
            let (nodes, assignment) = bind(&p);
            assert_eq!(assignment.len(), producers);
            let counts: Vec<usize> = nodes[1..5].iter().map(|n| n.producers.len()).collect();
            let max = counts.iter().max().unwrap();
            let min = counts.iter().min().unwrap();
            assert!(max - min <= 1, "uneven split {:?}", counts);
        }
    }

    #[test]
    fn test_bios_owns_system_producer() {
        let (nodes, assignment) = bind(&plan(3, 2, 2, 0));
        assert_eq!(nodes[0].producers, vec![SYSTEM_PRODUCER.to_string()]);
        assert_eq!(nodes[0].keys.len(), 1);
        assert_eq!(assignment.owner(SYSTEM_PRODUCER), None);
    }

    #[test]
    fn test_shared_producers_on_every_producing_node() {
        let (nodes, assignment) = bind(&plan(4, 3, 4, 2));
        for node in &nodes[1..3] {
            assert_eq!(node.producers.len(), 4);
            assert!(node.producers.contains(&"shrproducera".to_string()));
            assert!(node.producers.contains(&"shrproducerb".to_string()));
        }
        assert!(nodes[3].producers.is_empty());
        assert!(nodes[3].keys.is_empty());
        assert_eq!(assignment.len(), 4);
    }

    #[test]
    fn test_configuration_errors() {
        assert_eq!(plan(0, 0, 0, 0).validate(), Err(TopologyError::NoNodes));
        assert!(matches!(
            plan(3, 4, 4, 0).validate(),
            Err(TopologyError::TooManyProducerNodes { .. })
        ));
        assert!(matches!(
            plan(3, 1, 4, 0).validate(),
            Err(TopologyError::InsufficientProducerNodes { .. })
        ));
        assert!(matches!(
            plan(5, 4, 2, 0).validate(),
            Err(TopologyError::TooFewProducers { producers: 2, non_bios: 3 })
        ));
        let unstarted = BindingPlan { unstarted_nodes: 3, ..plan(3, 2, 2, 0) };
        assert!(matches!(unstarted.validate(), Err(TopologyError::TooManyUnstarted { .. })));
        assert!(plan(1, 1, 0, 0).validate().is_ok());
    }

    #[test]
    fn test_duplicate_producer_detected() {
        let (mut nodes, _) = bind(&plan(3, 3, 2, 0));
        let stolen = nodes[1].producers[0].clone();
        nodes[2].producers.push(stolen);
        let err = ProducerAssignment::from_nodes(&nodes).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateProducer { .. }));
    }
}
