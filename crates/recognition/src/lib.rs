pub mod attributes;
pub mod cursor;
pub mod graph;
pub mod patterns;
pub mod types;

pub use attributes::{ArcAttribute, AttributeKind, Vexity};
pub use cursor::AdjacencyCursor;
pub use graph::Aag;
pub use patterns::HolePattern;
pub use types::{FaceIndex, HoleKind, RecogError, RecognizedFeature};

use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};
use uuid::Uuid;

/// Drives pattern matchers over an adjacency graph and accumulates the
/// recognized features.
pub struct RecognitionEngine {
    graph: Aag,
    features: HashMap<Uuid, RecognizedFeature>,
    warnings: Vec<String>,
}

impl RecognitionEngine {
    pub fn new(graph: Aag) -> Self {
        Self {
            graph,
            features: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn graph(&self) -> &Aag {
        &self.graph
    }

    /// Run the hole matcher from every face, recording each distinct
    /// hole once. Two seeds that grow the same face set describe the
    /// same hole. Returns the ids of the features found by this call.
    #[instrument(skip(self))]
    pub fn find_holes(&mut self, max_radius: f64) -> Result<Vec<Uuid>, RecogError> {
        let pattern = HolePattern::new(&self.graph, max_radius);
        let mut known: BTreeSet<BTreeSet<FaceIndex>> = self
            .features
            .values()
            .map(|feature| feature.faces.clone())
            .collect();
        let mut found = Vec::new();

        let mut cursor = AdjacencyCursor::new(&self.graph);
        while cursor.more() {
            let seed = cursor.face_id();
            cursor.advance();
            let Some(feature) = pattern.recognize(seed)? else {
                // A wall-like face that matched nothing is worth a note.
                if let recog_kernel::geometry::Surface::Cylinder(c) = self.graph.face(seed).surface
                {
                    if c.radius > 0.0 && c.radius <= max_radius {
                        self.warnings
                            .push(format!("face {seed} looks like a bore wall but matched no hole"));
                    }
                }
                continue;
            };
            if !known.insert(feature.faces.clone()) {
                continue;
            }
            found.push(feature.id);
            self.features.insert(feature.id, feature);
        }

        info!(found = found.len(), "hole recognition pass finished");
        Ok(found)
    }

    pub fn feature(&self, id: Uuid) -> Option<&RecognizedFeature> {
        self.features.get(&id)
    }

    pub fn features(&self) -> impl Iterator<Item = &RecognizedFeature> {
        self.features.values()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
