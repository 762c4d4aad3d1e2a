//! Constructors for simple analytic solids.
//!
//! These are the models the test-suite and demos run against. Faces are
//! appended in a documented order so callers can address them by
//! ordinal: blocks always occupy ordinals 0..6 (bottom, top, front,
//! back, left, right), hole walls follow in pairs.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::{info, instrument};

use super::shape::{BoundarySource, EdgeCurve, ShapeModel, TrimLoop};
use crate::geometry::{Circle3d, Cylinder, Plane, Point2d, Point3d, Sphere, Surface, Vec3};

fn rect_loop(w: f64, h: f64) -> Vec<Point2d> {
    vec![
        Point2d::new(0.0, 0.0),
        Point2d::new(w, 0.0),
        Point2d::new(w, h),
        Point2d::new(0.0, h),
    ]
}

/// A polygonal approximation of a circle, for hole loops in planar trims.
fn circle_loop(cx: f64, cy: f64, radius: f64, segments: usize) -> Vec<Point2d> {
    (0..segments)
        .map(|i| {
            let angle = TAU * i as f64 / segments as f64;
            Point2d::new(cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

const HOLE_LOOP_SEGMENTS: usize = 24;

/// Append the six faces and twelve edges of an axis-aligned box with one
/// corner at the origin. Hole loops for the bottom and top trims may be
/// supplied by the caller. Returns nothing; faces land at ordinals 0..6.
fn add_box(shape: &mut ShapeModel, dx: f64, dy: f64, dz: f64, z_hole_loops: &[Vec<Point2d>]) {
    let holes = z_hole_loops.to_vec();
    let bottom = shape.add_face(
        Surface::Plane(Plane::with_axes(Point3d::ORIGIN, -Vec3::Z, Vec3::X, Vec3::Y)),
        TrimLoop::Polygon {
            outer: rect_loop(dx, dy),
            holes: holes.clone(),
        },
    );
    let top = shape.add_face(
        Surface::Plane(Plane::with_axes(
            Point3d::new(0.0, 0.0, dz),
            Vec3::Z,
            Vec3::X,
            Vec3::Y,
        )),
        TrimLoop::Polygon {
            outer: rect_loop(dx, dy),
            holes,
        },
    );
    let front = shape.add_face(
        Surface::Plane(Plane::with_axes(Point3d::ORIGIN, -Vec3::Y, Vec3::X, Vec3::Z)),
        TrimLoop::Polygon {
            outer: rect_loop(dx, dz),
            holes: vec![],
        },
    );
    let back = shape.add_face(
        Surface::Plane(Plane::with_axes(
            Point3d::new(0.0, dy, 0.0),
            Vec3::Y,
            Vec3::X,
            Vec3::Z,
        )),
        TrimLoop::Polygon {
            outer: rect_loop(dx, dz),
            holes: vec![],
        },
    );
    let left = shape.add_face(
        Surface::Plane(Plane::with_axes(Point3d::ORIGIN, -Vec3::X, Vec3::Y, Vec3::Z)),
        TrimLoop::Polygon {
            outer: rect_loop(dy, dz),
            holes: vec![],
        },
    );
    let right = shape.add_face(
        Surface::Plane(Plane::with_axes(
            Point3d::new(dx, 0.0, 0.0),
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
        )),
        TrimLoop::Polygon {
            outer: rect_loop(dy, dz),
            holes: vec![],
        },
    );

    let corner = |x: f64, y: f64, z: f64| Point3d::new(x, y, z);
    let seg = |a: Point3d, b: Point3d| EdgeCurve::Segment { start: a, end: b };

    let p000 = corner(0.0, 0.0, 0.0);
    let p100 = corner(dx, 0.0, 0.0);
    let p010 = corner(0.0, dy, 0.0);
    let p110 = corner(dx, dy, 0.0);
    let p001 = corner(0.0, 0.0, dz);
    let p101 = corner(dx, 0.0, dz);
    let p011 = corner(0.0, dy, dz);
    let p111 = corner(dx, dy, dz);

    shape.add_edge(seg(p000, p100), &[bottom, front]);
    shape.add_edge(seg(p100, p110), &[bottom, right]);
    shape.add_edge(seg(p110, p010), &[bottom, back]);
    shape.add_edge(seg(p010, p000), &[bottom, left]);
    shape.add_edge(seg(p001, p101), &[top, front]);
    shape.add_edge(seg(p101, p111), &[top, right]);
    shape.add_edge(seg(p111, p011), &[top, back]);
    shape.add_edge(seg(p011, p001), &[top, left]);
    shape.add_edge(seg(p000, p001), &[front, left]);
    shape.add_edge(seg(p100, p101), &[front, right]);
    shape.add_edge(seg(p110, p111), &[back, right]);
    shape.add_edge(seg(p010, p011), &[back, left]);
}

/// Append the two half-cylinder wall faces of a vertical hole spanning
/// `z0..z1`, with seam edges between them and rim arcs against the cap
/// faces. Returns the wall ordinals.
fn add_hole_walls(
    shape: &mut ShapeModel,
    cx: f64,
    cy: f64,
    radius: f64,
    z0: f64,
    z1: f64,
    bottom_cap: u32,
    top_cap: u32,
) -> (u32, u32) {
    let cylinder = Cylinder::with_frame(Point3d::new(cx, cy, z0), Vec3::Z, radius, Vec3::X);
    let wall_a = shape.add_face(
        Surface::Cylinder(cylinder),
        TrimLoop::Rect {
            u: (0.0, PI),
            v: (0.0, z1 - z0),
            wrap_u: false,
        },
    );
    let wall_b = shape.add_face(
        Surface::Cylinder(cylinder),
        TrimLoop::Rect {
            u: (PI, TAU),
            v: (0.0, z1 - z0),
            wrap_u: false,
        },
    );

    // Seams at u = 0 and u = pi.
    shape.add_edge(
        EdgeCurve::Segment {
            start: Point3d::new(cx + radius, cy, z0),
            end: Point3d::new(cx + radius, cy, z1),
        },
        &[wall_a, wall_b],
    );
    shape.add_edge(
        EdgeCurve::Segment {
            start: Point3d::new(cx - radius, cy, z0),
            end: Point3d::new(cx - radius, cy, z1),
        },
        &[wall_a, wall_b],
    );

    // Rim arcs, one per cap per wall half.
    let bottom_rim = Circle3d::new(Point3d::new(cx, cy, z0), Vec3::Z, radius);
    let top_rim = Circle3d::new(Point3d::new(cx, cy, z1), Vec3::Z, radius);
    shape.add_edge(EdgeCurve::Arc(bottom_rim), &[bottom_cap, wall_a]);
    shape.add_edge(EdgeCurve::Arc(bottom_rim), &[bottom_cap, wall_b]);
    shape.add_edge(EdgeCurve::Arc(top_rim), &[top_cap, wall_a]);
    shape.add_edge(EdgeCurve::Arc(top_rim), &[top_cap, wall_b]);

    (wall_a, wall_b)
}

// ─── Public constructors ─────────────────────────────────────────────────────

/// An axis-aligned solid block with one corner at the origin.
#[instrument]
pub fn make_block(dx: f64, dy: f64, dz: f64) -> ShapeModel {
    let mut shape = ShapeModel::new();
    add_box(&mut shape, dx, dy, dz, &[]);
    info!(faces = shape.face_count(), "built block");
    shape
}

/// A solid ball centered at the origin: a single spherical face with no
/// edges, so its face is isolated in any adjacency graph.
#[instrument]
pub fn make_ball(radius: f64) -> ShapeModel {
    let mut shape = ShapeModel::new();
    shape.add_face(
        Surface::Sphere(Sphere::new(Point3d::ORIGIN, radius)),
        TrimLoop::Rect {
            u: (0.0, TAU),
            v: (-FRAC_PI_2, FRAC_PI_2),
            wrap_u: true,
        },
    );
    info!(faces = shape.face_count(), "built ball");
    shape
}

/// A block with vertical through holes. Each entry of `bores` is
/// `(cx, cy, radius)`. Wall faces land at ordinals 6, 7, 8, 9, ... in
/// bore order.
#[instrument(skip(bores))]
pub fn make_drilled_block(dx: f64, dy: f64, dz: f64, bores: &[(f64, f64, f64)]) -> ShapeModel {
    let mut shape = ShapeModel::new();
    let loops: Vec<Vec<Point2d>> = bores
        .iter()
        .map(|&(cx, cy, r)| circle_loop(cx, cy, r, HOLE_LOOP_SEGMENTS))
        .collect();
    add_box(&mut shape, dx, dy, dz, &loops);
    for &(cx, cy, r) in bores {
        add_hole_walls(&mut shape, cx, cy, r, 0.0, dz, 0, 1);
    }
    info!(
        faces = shape.face_count(),
        bores = bores.len(),
        "built drilled block"
    );
    shape
}

/// A block with one vertical blind hole drilled `depth` into the top
/// face. The floor cap lands at ordinal 6, the wall faces at 7 and 8.
#[instrument]
pub fn make_blind_hole_block(
    dx: f64,
    dy: f64,
    dz: f64,
    cx: f64,
    cy: f64,
    radius: f64,
    depth: f64,
) -> ShapeModel {
    let mut shape = ShapeModel::new();
    // The box helper punches a hole loop into both z caps; a blind hole
    // only opens on top, so patch the top trim after building the box.
    add_box(&mut shape, dx, dy, dz, &[]);
    shape.set_face_trim(
        1,
        TrimLoop::Polygon {
            outer: rect_loop(dx, dy),
            holes: vec![circle_loop(cx, cy, radius, HOLE_LOOP_SEGMENTS)],
        },
    );

    let floor_z = dz - depth;
    let floor = shape.add_face(
        Surface::Plane(Plane::with_axes(
            Point3d::new(cx, cy, floor_z),
            Vec3::Z,
            Vec3::X,
            Vec3::Y,
        )),
        TrimLoop::Polygon {
            outer: circle_loop(0.0, 0.0, radius, HOLE_LOOP_SEGMENTS),
            holes: vec![],
        },
    );
    add_hole_walls(&mut shape, cx, cy, radius, floor_z, dz, floor, 1);
    info!(faces = shape.face_count(), "built blind-hole block");
    shape
}
