use std::f64::consts::TAU;

use crate::boundary::{BoundarySource, ShapeModel};
use crate::geometry::intersection::{ray_aabb, ray_surface};
use crate::geometry::{Point3d, Ray, Vec3};
use crate::spatial::{BvhIterator, BvhTree};
use crate::Tolerance;

/// Source of uniform samples in `[0, 1)`. Classification never owns its
/// randomness; callers inject whatever source suits them, which keeps
/// runs reproducible.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<R: UniformSource + ?Sized> UniformSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// A small linear congruential generator. Not cryptographic; good
/// enough for scattering ray directions.
#[derive(Debug, Clone)]
pub struct Lcg64 {
    state: u64,
}

impl Lcg64 {
    pub fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl UniformSource for Lcg64 {
    fn next_uniform(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.state >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// A direction drawn uniformly from the unit sphere.
pub fn random_direction<R: UniformSource>(rng: &mut R) -> Vec3 {
    let theta = TAU * rng.next_uniform();
    let phi = (2.0 * rng.next_uniform() - 1.0).clamp(-1.0, 1.0).acos();
    let sin_phi = phi.sin();
    Vec3::new(sin_phi * theta.cos(), sin_phi * theta.sin(), phi.cos())
}

pub fn random_ray<R: UniformSource>(origin: Point3d, rng: &mut R) -> Ray {
    Ray::new(origin, random_direction(rng))
}

/// One crossing of a ray with the model boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryHit {
    pub t: f64,
    pub point: Point3d,
    /// Ordinal of the face that was hit.
    pub face: u32,
    /// The hit lies within tolerance of one of the face's bounding
    /// edges, so its crossing parity is unreliable.
    pub singular: bool,
}

/// Casts rays against a boundary model, pruning faces through a BVH
/// whose primitives are face ordinals.
pub struct RayCaster<'a> {
    shape: &'a ShapeModel,
    tree: &'a BvhTree,
    tol: Tolerance,
}

impl<'a> RayCaster<'a> {
    pub fn new(shape: &'a ShapeModel, tree: &'a BvhTree, tol: Tolerance) -> Self {
        Self { shape, tree, tol }
    }

    /// All boundary crossings along the ray at `t > 0`, sorted by `t`.
    pub fn cast(&self, ray: &Ray) -> Vec<BoundaryHit> {
        let mut hits = Vec::new();
        let mut it = BvhIterator::new(self.tree);
        while it.more() {
            let node = *it.current();
            if node.is_leaf() {
                for &ordinal in self.tree.leaf_prims(&node) {
                    self.intersect_face(ray, ordinal, &mut hits);
                }
            } else {
                if !ray_aabb(ray, &self.tree.node(node.left).bbox) {
                    it.block_left();
                }
                if !ray_aabb(ray, &self.tree.node(node.right).bbox) {
                    it.block_right();
                }
            }
            it.advance();
        }
        hits.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap_or(std::cmp::Ordering::Equal));
        hits
    }

    fn intersect_face(&self, ray: &Ray, ordinal: u32, hits: &mut Vec<BoundaryHit>) {
        let face = self.shape.face(ordinal as usize);
        for hit in ray_surface(ray, &face.surface) {
            // Crossings at the origin itself carry no parity information.
            if hit.t <= self.tol.precision {
                continue;
            }
            let (u, v, _) = face.surface.parameters_of(&hit.point);
            if !face.trim.contains(u, v, self.tol.precision) {
                continue;
            }
            let singular = face.edges.iter().any(|&key| {
                self.shape.edge(key).curve.distance_to_point(&hit.point) <= self.tol.inaccuracy
            });
            hits.push(BoundaryHit {
                t: hit.t,
                point: hit.point,
                face: ordinal,
                singular,
            });
        }
    }
}

/// Build the face-ordinal BVH for a model.
pub fn build_face_tree(shape: &ShapeModel, tol: &Tolerance) -> BvhTree {
    let boxes: Vec<_> = (0..shape.face_count())
        .map(|ordinal| shape.face_bounding_box(ordinal, tol.inaccuracy))
        .collect();
    BvhTree::build_median(&boxes, 2)
}
