use tracing::debug;

use super::face::FaceClassifier;
use super::membership::Membership;
use super::ray::{build_face_tree, random_ray, RayCaster, UniformSource};
use crate::boundary::{BoundarySource, ShapeModel};
use crate::geometry::Point3d;
use crate::spatial::{BvhIterator, BvhTree};
use crate::Tolerance;

/// Number of rays tried before a query gives up as [`Membership::Unknown`].
const MAX_ATTEMPTS: usize = 16;

/// Point-in-solid classification by ray parity.
///
/// A query first checks whether the point lies on the boundary. If not,
/// a random ray is cast and the crossing count decides in or out. Rays
/// that graze an edge produce singular hits with unreliable parity;
/// those rays are discarded and a fresh direction is drawn.
pub struct SolidClassifier<'a> {
    shape: &'a ShapeModel,
    tree: BvhTree,
    tol: Tolerance,
}

impl<'a> SolidClassifier<'a> {
    pub fn new(shape: &'a ShapeModel, tol: Tolerance) -> Self {
        let tree = build_face_tree(shape, &tol);
        Self { shape, tree, tol }
    }

    /// Whether `point` lies on some face, within tolerance. Walks the
    /// BVH, pruning subtrees whose box does not contain the point.
    fn on_boundary(&self, point: &Point3d) -> bool {
        let mut it = BvhIterator::new(&self.tree);
        while it.more() {
            let node = *it.current();
            if node.is_leaf() {
                for &ordinal in self.tree.leaf_prims(&node) {
                    let face = self.shape.face(ordinal as usize);
                    let hit = FaceClassifier::new(face, self.tol).classify(point);
                    if hit.membership == Membership::On {
                        return true;
                    }
                }
            } else {
                if !self.tree.node(node.left).bbox.contains_point(point) {
                    it.block_left();
                }
                if !self.tree.node(node.right).bbox.contains_point(point) {
                    it.block_right();
                }
            }
            it.advance();
        }
        false
    }

    /// Classify one point. Draws ray directions from `rng`; a seeded
    /// source makes the query reproducible.
    pub fn classify<R: UniformSource>(&self, point: &Point3d, rng: &mut R) -> Membership {
        if self.on_boundary(point) {
            return Membership::On;
        }
        let caster = RayCaster::new(self.shape, &self.tree, self.tol);
        for attempt in 0..MAX_ATTEMPTS {
            let ray = random_ray(*point, rng);
            let hits = caster.cast(&ray);
            if hits.iter().any(|h| h.singular) {
                debug!(attempt, "discarding ray with singular hit");
                continue;
            }
            let ts: Vec<f64> = hits.iter().map(|h| h.t).collect();
            let crossings =
                crate::geometry::intersection::deduplicate_crossings(&ts, self.tol.inaccuracy);
            return if crossings % 2 == 1 {
                Membership::In
            } else {
                Membership::Out
            };
        }
        debug!("all ray attempts were singular");
        Membership::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::primitives::{make_ball, make_block, make_drilled_block};
    use crate::classify::ray::Lcg64;

    fn classify(shape: &ShapeModel, point: Point3d, seed: u64) -> Membership {
        let classifier = SolidClassifier::new(shape, Tolerance::default());
        let mut rng = Lcg64::seeded(seed);
        classifier.classify(&point, &mut rng)
    }

    #[test]
    fn test_block_center_is_in() {
        let shape = make_block(2.0, 2.0, 2.0);
        assert_eq!(
            classify(&shape, Point3d::new(1.0, 1.0, 1.0), 1),
            Membership::In
        );
    }

    #[test]
    fn test_block_outside_is_out() {
        let shape = make_block(2.0, 2.0, 2.0);
        assert_eq!(
            classify(&shape, Point3d::new(5.0, 1.0, 1.0), 1),
            Membership::Out
        );
    }

    #[test]
    fn test_block_face_point_is_on() {
        let shape = make_block(2.0, 2.0, 2.0);
        assert_eq!(
            classify(&shape, Point3d::new(1.0, 1.0, 2.0), 1),
            Membership::On
        );
    }

    #[test]
    fn test_point_inside_bore_is_out() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        assert_eq!(
            classify(&shape, Point3d::new(5.0, 5.0, 2.5), 3),
            Membership::Out
        );
    }

    #[test]
    fn test_point_beside_bore_is_in() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        assert_eq!(
            classify(&shape, Point3d::new(2.0, 2.0, 2.5), 3),
            Membership::In
        );
    }

    #[test]
    fn test_ball_center_is_in() {
        let shape = make_ball(1.0);
        assert_eq!(classify(&shape, Point3d::ORIGIN, 5), Membership::In);
    }

    #[test]
    fn test_ball_surface_is_on() {
        let shape = make_ball(1.0);
        assert_eq!(
            classify(&shape, Point3d::new(0.0, 0.0, 1.0), 5),
            Membership::On
        );
    }
}
