use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// One-based identifier of a face in the adjacency graph.
///
/// Graph consumers address faces the way engineering drawings do,
/// starting at 1; ordinal 0 in the underlying boundary model is face 1
/// here.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FaceIndex(u32);

impl FaceIndex {
    pub fn new(index: u32) -> Self {
        assert!(index >= 1, "face indices start at 1");
        Self(index)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The zero-based ordinal in the boundary model.
    pub fn to_ordinal(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Self {
        Self(ordinal as u32 + 1)
    }
}

impl fmt::Display for FaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Whether a recognized hole pierces the stock or stops at a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleKind {
    Through,
    Blind,
}

/// A recognized machining feature. Identity is the generated id; two
/// recognitions of the same geometry produce equal face sets but
/// distinct ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedFeature {
    pub id: Uuid,
    pub kind: HoleKind,
    pub faces: BTreeSet<FaceIndex>,
    pub radius: f64,
}

impl RecognizedFeature {
    pub fn new(kind: HoleKind, faces: BTreeSet<FaceIndex>, radius: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            faces,
            radius,
        }
    }
}

#[derive(Debug, Error)]
pub enum RecogError {
    #[error("face index {index} is out of range for a graph of {count} faces")]
    InvalidSeed { index: u32, count: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_index_ordinal_roundtrip() {
        let f = FaceIndex::from_ordinal(0);
        assert_eq!(f.get(), 1);
        assert_eq!(f.to_ordinal(), 0);
        assert_eq!(format!("{f}"), "F1");
    }

    #[test]
    #[should_panic(expected = "face indices start at 1")]
    fn test_zero_face_index_panics() {
        let _ = FaceIndex::new(0);
    }

    #[test]
    fn test_invalid_seed_message() {
        let err = RecogError::InvalidSeed { index: 9, count: 6 };
        assert!(err.to_string().contains("out of range"));
    }
}
