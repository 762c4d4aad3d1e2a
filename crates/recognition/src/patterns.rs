use std::collections::{BTreeSet, VecDeque};

use recog_kernel::boundary::TrimLoop;
use recog_kernel::geometry::{Cylinder, Surface};
use tracing::debug;

use crate::graph::Aag;
use crate::types::{FaceIndex, HoleKind, RecogError, RecognizedFeature};

/// Matcher for cylindrical holes in an adjacency graph.
///
/// A hole is a connected run of coaxial cylindrical wall faces of equal
/// radius, together with the planar cap faces its rims touch. The walk
/// starts from a seed wall and expands wall-to-wall only; caps are
/// collected but never expanded, so two holes sharing a cap face stay
/// separate features.
pub struct HolePattern<'a> {
    graph: &'a Aag,
    max_radius: f64,
}

impl<'a> HolePattern<'a> {
    /// `max_radius` bounds the holes worth reporting; a seed whose
    /// radius exceeds it is not a hole. Equal radius is accepted.
    pub fn new(graph: &'a Aag, max_radius: f64) -> Self {
        assert!(max_radius > 0.0, "max radius must be positive");
        Self { graph, max_radius }
    }

    fn seed_cylinder(&self, seed: FaceIndex) -> Option<Cylinder> {
        match self.graph.face(seed).surface {
            Surface::Cylinder(c) => Some(c),
            _ => None,
        }
    }

    /// Try to recognize a hole grown from `seed`. A seed outside the
    /// model is an error; a seed that simply fails the pattern is
    /// `Ok(None)`.
    pub fn recognize(&self, seed: FaceIndex) -> Result<Option<RecognizedFeature>, RecogError> {
        if seed.to_ordinal() >= self.graph.face_count() {
            return Err(RecogError::InvalidSeed {
                index: seed.get(),
                count: self.graph.face_count(),
            });
        }
        let tol = *self.graph.tolerance();
        let Some(seed_cyl) = self.seed_cylinder(seed) else {
            return Ok(None);
        };
        if seed_cyl.radius < tol.precision {
            debug!(%seed, "seed cylinder is degenerate");
            return Ok(None);
        }
        if seed_cyl.radius > self.max_radius {
            debug!(%seed, radius = seed_cyl.radius, "seed wider than the hole bound");
            return Ok(None);
        }

        let mut walls: BTreeSet<FaceIndex> = BTreeSet::new();
        let mut caps: BTreeSet<FaceIndex> = BTreeSet::new();
        let mut queue = VecDeque::new();
        walls.insert(seed);
        queue.push_back(seed);

        while let Some(face) = queue.pop_front() {
            for &neighbor in self.graph.neighbors(face) {
                if walls.contains(&neighbor) || caps.contains(&neighbor) {
                    continue;
                }
                match self.graph.face(neighbor).surface {
                    Surface::Cylinder(c)
                        if c.is_coaxial_with(&seed_cyl, tol.angular, tol.inaccuracy) =>
                    {
                        walls.insert(neighbor);
                        queue.push_back(neighbor);
                    }
                    Surface::Plane(p) if p.normal.is_parallel_to(&seed_cyl.axis, tol.angular) => {
                        caps.insert(neighbor);
                    }
                    _ => {}
                }
            }
        }

        if walls.len() + caps.len() < 2 {
            debug!(%seed, "wall run touches nothing; not a hole");
            return Ok(None);
        }

        // A cap whose trim is a plain region with no opening is a floor.
        let has_floor = caps.iter().any(|&cap| {
            matches!(
                &self.graph.face(cap).trim,
                TrimLoop::Polygon { holes, .. } if holes.is_empty()
            )
        });
        let kind = if has_floor {
            HoleKind::Blind
        } else {
            HoleKind::Through
        };

        let mut faces = walls;
        faces.extend(caps);
        Ok(Some(RecognizedFeature::new(kind, faces, seed_cyl.radius)))
    }
}
