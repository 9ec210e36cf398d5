//! Peer graph generation.
//!
//! Every builtin shape connects the regular nodes among themselves and then
//! has each regular node dial bios, so bios can feed blocks and transactions
//! to all producers while bootstrapping. The bridge shape is the exception:
//! only its bridge nodes dial bios, so the producer groups stay reachable
//! from each other through the bridges alone.

use log::{debug, info, warn};

use crate::error::TopologyError;
use crate::node::{NodeRecord, BIOS_NAME};
use crate::topology::bridge::make_bridge;
use crate::topology::types::Shape;

/// Populate `peers` on bound nodes according to `shape`.
///
/// `producers` is the size of the unique producer pool, which the bridge
/// shape needs to split producers into its two groups.
pub fn connect_nodes(
    nodes: &mut [NodeRecord],
    shape: &Shape,
    producers: usize,
) -> Result<(), TopologyError> {
    info!("Connecting {} nodes as {}", nodes.len(), shape);
    match shape {
        Shape::Line => make_line(nodes, false),
        Shape::Ring => make_line(nodes, true),
        Shape::Star => make_star(nodes),
        Shape::Mesh => make_mesh(nodes),
        Shape::Bridge => return make_bridge(nodes, producers),
        // Peers were read from the file along with everything else
        Shape::Custom(_) => return Ok(()),
    }
    peer_with_bios(nodes);
    Ok(())
}

/// Positions of the non-bios nodes, in creation order.
pub(crate) fn regular_positions(nodes: &[NodeRecord]) -> Vec<usize> {
    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !node.is_bios())
        .map(|(pos, _)| pos)
        .collect()
}

/// Adds the edge `from -> to` by position.
pub(crate) fn link(nodes: &mut [NodeRecord], from: usize, to: usize) {
    let peer = nodes[to].name.clone();
    if nodes[from].add_peer(&peer) {
        debug!("{} -> {}", nodes[from].name, peer);
    }
}

/// Connects every listed node to every other listed node.
pub(crate) fn mesh_within(nodes: &mut [NodeRecord], members: &[usize]) {
    for &from in members {
        for &to in members {
            if from != to {
                link(nodes, from, to);
            }
        }
    }
}

fn peer_with_bios(nodes: &mut [NodeRecord]) {
    if !nodes.iter().any(|n| n.is_bios()) {
        return;
    }
    for node in nodes.iter_mut().filter(|n| !n.is_bios()) {
        node.add_peer(BIOS_NAME);
    }
}

fn make_line(nodes: &mut [NodeRecord], make_ring: bool) {
    let positions = regular_positions(nodes);
    for pair in positions.windows(2) {
        link(nodes, pair[0], pair[1]);
    }
    if make_ring && positions.len() >= 2 {
        link(nodes, positions[positions.len() - 1], positions[0]);
    }
}

fn make_mesh(nodes: &mut [NodeRecord]) {
    let positions = regular_positions(nodes);
    mesh_within(nodes, &positions);
}

/// Number of links each star node tries to establish.
pub fn star_links(non_bios: usize) -> usize {
    let root = (non_bios as f64).sqrt().floor() as usize;
    (root + 2).max(3)
}

/// Stride used to pick star link candidates; never divides `non_bios`.
pub fn star_gap(non_bios: usize, links: usize) -> usize {
    if non_bios == 0 {
        return 1;
    }
    let mut gap = if non_bios > 6 {
        3
    } else {
        non_bios.saturating_sub(links) / 2 + 1
    };
    while non_bios % gap == 0 {
        gap += 1;
    }
    gap
}

fn make_star(nodes: &mut [NodeRecord]) {
    let positions = regular_positions(nodes);
    let count = positions.len();
    if count < 4 {
        info!("Only {} non-bios nodes, star degenerates to a line", count);
        make_line(nodes, false);
        return;
    }

    let links = star_links(count);
    let gap = star_gap(count, links);
    debug!("Star layout: {} links per node, gap {}", links, gap);

    for i in 0..count {
        for l in 1..=links {
            let start = (i + l * gap) % count;
            match find_star_peer(nodes, &positions, i, start) {
                Some(j) => link(nodes, positions[i], positions[j]),
                None => warn!(
                    "No free star peer for {} (link {} of {}), leaving it unset",
                    nodes[positions[i]].name, l, links
                ),
            }
        }
    }
}

/// Walks forward from `start` over the ring of regular nodes looking for a
/// node that is neither `current` nor already connected to it in either
/// direction. Each candidate is tried at most once.
fn find_star_peer(
    nodes: &[NodeRecord],
    positions: &[usize],
    current: usize,
    start: usize,
) -> Option<usize> {
    let count = positions.len();
    let me = &nodes[positions[current]];
    let mut candidate = start;
    for _ in 0..count {
        if candidate != current {
            let other = &nodes[positions[candidate]];
            if !me.has_peer(&other.name) && !other.has_peer(&me.name) {
                return Some(candidate);
            }
        }
        candidate = (candidate + 1) % count;
    }
    None
}
