use recog_kernel::boundary::EdgeKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Discriminant for looking an attribute up on a graph arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKind {
    Vexity,
    CommonEdges,
}

/// Local shape of the boundary across a shared edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vexity {
    /// The dihedral opens away from the material, like a box corner.
    Convex,
    /// The dihedral folds into the material, like a pocket floor.
    Concave,
    /// Tangent continuity across the edge.
    Smooth,
    /// Geometry too ambiguous to decide.
    Undefined,
}

/// Payload attached to one arc of the adjacency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArcAttribute {
    Vexity(Vexity),
    CommonEdges(BTreeSet<EdgeKey>),
}

impl ArcAttribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            ArcAttribute::Vexity(_) => AttributeKind::Vexity,
            ArcAttribute::CommonEdges(_) => AttributeKind::CommonEdges,
        }
    }
}
