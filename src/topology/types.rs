//! Topology shape definitions.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::TopologyError;

/// Peer graph layout requested for a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// Each node dials the next one in sequence
    Line,
    /// Line plus a closing edge from the last node to the first
    Ring,
    /// Low-diameter layout with a bounded number of links per node
    Star,
    /// Every node dials every other node
    Mesh,
    /// Two fully meshed producer groups joined only through bridge nodes
    Bridge,
    /// Nodes, peers and producers read verbatim from a topology file
    Custom(PathBuf),
}

impl Shape {
    /// Resolve a shape name, falling back to a topology file path.
    pub fn resolve(name: &str) -> Result<Shape, TopologyError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Shape::Line),
            "ring" => Ok(Shape::Ring),
            "star" => Ok(Shape::Star),
            "mesh" => Ok(Shape::Mesh),
            "bridge" => Ok(Shape::Bridge),
            _ => {
                let path = Path::new(name.trim());
                if path.is_file() {
                    Ok(Shape::Custom(path.to_path_buf()))
                } else {
                    Err(TopologyError::UnknownShape(name.to_string()))
                }
            }
        }
    }

    /// Returns true if peers come from a file instead of an algorithm
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Line => write!(f, "line"),
            Shape::Ring => write!(f, "ring"),
            Shape::Star => write!(f, "star"),
            Shape::Mesh => write!(f, "mesh"),
            Shape::Bridge => write!(f, "bridge"),
            Shape::Custom(path) => write!(f, "{}", path.display()),
        }
    }
}
