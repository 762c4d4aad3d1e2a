use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::f64::consts::TAU;

use crate::geometry::{BoundingBox, Circle3d, Point2d, Point3d, Surface};

new_key_type! {
    /// Stable handle for an edge in a [`ShapeModel`].
    pub struct EdgeKey;
}

/// The curve geometry carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EdgeCurve {
    Segment { start: Point3d, end: Point3d },
    Arc(Circle3d),
}

impl EdgeCurve {
    /// Distance from `point` to the nearest point of the curve.
    pub fn distance_to_point(&self, point: &Point3d) -> f64 {
        match self {
            EdgeCurve::Segment { start, end } => {
                let dir = *end - *start;
                let len_sq = dir.length_squared();
                if len_sq < 1e-24 {
                    return start.distance_to(point);
                }
                let t = ((*point - *start).dot(&dir) / len_sq).clamp(0.0, 1.0);
                point.distance_to(&(*start + dir * t))
            }
            EdgeCurve::Arc(circle) => circle.distance_to_point(point),
        }
    }

    /// A representative point on the curve, for vexity probing.
    pub fn midpoint(&self) -> Point3d {
        match self {
            EdgeCurve::Segment { start, end } => start.midpoint(end),
            EdgeCurve::Arc(circle) => {
                // Any rim point works; pick one in the circle's plane.
                let helper = if circle.normal.x.abs() < 0.9 {
                    crate::geometry::Vec3::X
                } else {
                    crate::geometry::Vec3::Y
                };
                let radial = circle.normal.cross(&helper).normalize();
                circle.center + radial * circle.radius
            }
        }
    }
}

/// An edge together with the ordinals of the faces that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub curve: EdgeCurve,
    pub owners: Vec<u32>,
}

/// The trimmed region of a face in its surface's uv space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrimLoop {
    /// A polygonal outer loop with zero or more polygonal holes.
    Polygon {
        outer: Vec<Point2d>,
        holes: Vec<Vec<Point2d>>,
    },
    /// An axis-aligned parameter rectangle. `wrap_u` marks a face whose
    /// u range covers the surface's full period, so the u bounds are
    /// not enforced.
    Rect {
        u: (f64, f64),
        v: (f64, f64),
        wrap_u: bool,
    },
}

/// Even-odd point-in-polygon test.
fn point_in_polygon(p: &Point2d, poly: &[Point2d]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (&poly[i], &poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_polygon_boundary(p: &Point2d, poly: &[Point2d]) -> f64 {
    let mut best = f64::INFINITY;
    let n = poly.len();
    if n == 0 {
        return best;
    }
    for i in 0..n {
        let a = &poly[i];
        let b = &poly[(i + 1) % n];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        let t = if len_sq < 1e-24 {
            0.0
        } else {
            (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
        };
        let q = Point2d::new(a.x + dx * t, a.y + dy * t);
        best = best.min(p.distance_to(&q));
    }
    best
}

impl TrimLoop {
    /// Whether `(u, v)` lies in the trimmed region, counting points
    /// within `slack` of the boundary as inside.
    pub fn contains(&self, u: f64, v: f64, slack: f64) -> bool {
        match self {
            TrimLoop::Polygon { outer, holes } => {
                let p = Point2d::new(u, v);
                if distance_to_polygon_boundary(&p, outer) <= slack {
                    return true;
                }
                if !point_in_polygon(&p, outer) {
                    return false;
                }
                for hole in holes {
                    if distance_to_polygon_boundary(&p, hole) <= slack {
                        return true;
                    }
                    if point_in_polygon(&p, hole) {
                        return false;
                    }
                }
                true
            }
            TrimLoop::Rect {
                u: (u0, u1),
                v: (v0, v1),
                wrap_u,
            } => {
                let v_ok = v >= v0 - slack && v <= v1 + slack;
                if *wrap_u {
                    return v_ok;
                }
                // Angles come in wrapped to [0, tau); compare against a
                // range that may also be expressed in that window.
                let u_ok = (u >= u0 - slack && u <= u1 + slack)
                    || (u + TAU >= u0 - slack && u + TAU <= u1 + slack)
                    || (u - TAU >= u0 - slack && u - TAU <= u1 + slack);
                v_ok && u_ok
            }
        }
    }
}

/// A face: its carrier surface, the trimmed region, and the edges that
/// bound it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub surface: Surface,
    pub trim: TrimLoop,
    pub edges: Vec<EdgeKey>,
}

/// Read access to a boundary representation. Faces are addressed by
/// zero-based ordinal; edges by stable key.
pub trait BoundarySource {
    fn face_count(&self) -> usize;
    fn face(&self, ordinal: usize) -> &FaceRecord;
    fn edge(&self, key: EdgeKey) -> &EdgeRecord;
    fn edge_keys(&self) -> Vec<EdgeKey>;
}

/// The in-memory boundary model used throughout the crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeModel {
    faces: Vec<FaceRecord>,
    edges: SlotMap<EdgeKey, EdgeRecord>,
}

impl ShapeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a face, returning its ordinal.
    pub fn add_face(&mut self, surface: Surface, trim: TrimLoop) -> u32 {
        self.faces.push(FaceRecord {
            surface,
            trim,
            edges: Vec::new(),
        });
        (self.faces.len() - 1) as u32
    }

    /// Insert an edge owned by the given faces and link it into each
    /// owner's edge list.
    pub fn add_edge(&mut self, curve: EdgeCurve, owners: &[u32]) -> EdgeKey {
        let key = self.edges.insert(EdgeRecord {
            curve,
            owners: owners.to_vec(),
        });
        for &owner in owners {
            self.faces[owner as usize].edges.push(key);
        }
        key
    }

    pub fn faces(&self) -> &[FaceRecord] {
        &self.faces
    }

    /// Replace the trim of an existing face.
    pub fn set_face_trim(&mut self, ordinal: usize, trim: TrimLoop) {
        self.faces[ordinal].trim = trim;
    }

    /// AABB of one face, from sampled surface points grown by `margin`.
    /// The box is conservative: every point of the trimmed surface lies
    /// inside it.
    pub fn face_bounding_box(&self, ordinal: usize, margin: f64) -> BoundingBox {
        let face = &self.faces[ordinal];
        let mut bbox = BoundingBox::empty();
        let mut sag = 0.0;
        match &face.trim {
            TrimLoop::Polygon { outer, holes } => {
                for p in outer.iter().chain(holes.iter().flatten()) {
                    bbox.expand_to_include(&face.surface.evaluate(p.x, p.y));
                }
            }
            TrimLoop::Rect { u, v, wrap_u } => {
                let (u0, u1) = if *wrap_u { (0.0, TAU) } else { *u };
                let (v0, v1) = *v;
                const U_STEPS: usize = 16;
                const V_STEPS: usize = 8;
                for i in 0..=U_STEPS {
                    let uu = u0 + (u1 - u0) * i as f64 / U_STEPS as f64;
                    for j in 0..=V_STEPS {
                        let vv = v0 + (v1 - v0) * j as f64 / V_STEPS as f64;
                        bbox.expand_to_include(&face.surface.evaluate(uu, vv));
                    }
                }
                // Curved surfaces bulge past the sampled chords; pad by
                // the sagitta of one sampling step so no surface point
                // escapes the box.
                let du = (u1 - u0) / U_STEPS as f64;
                let dv = (v1 - v0) / V_STEPS as f64;
                sag = match &face.surface {
                    Surface::Plane(_) => 0.0,
                    Surface::Cylinder(c) => c.radius * (1.0 - (du * 0.5).cos()),
                    Surface::Sphere(s) => {
                        s.radius * ((1.0 - (du * 0.5).cos()) + (1.0 - (dv * 0.5).cos()))
                    }
                };
            }
        }
        bbox.expanded(margin + sag)
    }

    /// AABB of the whole model.
    pub fn bounding_box(&self, margin: f64) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for ordinal in 0..self.faces.len() {
            bbox = bbox.union(&self.face_bounding_box(ordinal, 0.0));
        }
        bbox.expanded(margin)
    }
}

impl BoundarySource for ShapeModel {
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, ordinal: usize) -> &FaceRecord {
        &self.faces[ordinal]
    }

    fn edge(&self, key: EdgeKey) -> &EdgeRecord {
        &self.edges[key]
    }

    fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Plane, Vec3};

    fn unit_square() -> Vec<Point2d> {
        vec![
            Point2d::new(0.0, 0.0),
            Point2d::new(1.0, 0.0),
            Point2d::new(1.0, 1.0),
            Point2d::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_polygon_trim_contains() {
        let trim = TrimLoop::Polygon {
            outer: unit_square(),
            holes: vec![],
        };
        assert!(trim.contains(0.5, 0.5, 1e-9));
        assert!(!trim.contains(1.5, 0.5, 1e-9));
        // On the boundary, within slack.
        assert!(trim.contains(1.0 + 1e-10, 0.5, 1e-9));
    }

    #[test]
    fn test_polygon_trim_hole_excludes() {
        let hole = vec![
            Point2d::new(0.4, 0.4),
            Point2d::new(0.6, 0.4),
            Point2d::new(0.6, 0.6),
            Point2d::new(0.4, 0.6),
        ];
        let trim = TrimLoop::Polygon {
            outer: unit_square(),
            holes: vec![hole],
        };
        assert!(trim.contains(0.2, 0.2, 1e-9));
        assert!(!trim.contains(0.5, 0.5, 1e-9));
        // Hole boundary counts as inside the face.
        assert!(trim.contains(0.4, 0.5, 1e-9));
    }

    #[test]
    fn test_rect_trim_wrap() {
        let trim = TrimLoop::Rect {
            u: (0.0, TAU),
            v: (0.0, 2.0),
            wrap_u: true,
        };
        assert!(trim.contains(5.9, 1.0, 1e-9));
        assert!(!trim.contains(5.9, 3.0, 1e-9));
    }

    #[test]
    fn test_rect_trim_half_period() {
        let trim = TrimLoop::Rect {
            u: (0.0, std::f64::consts::PI),
            v: (0.0, 1.0),
            wrap_u: false,
        };
        assert!(trim.contains(1.0, 0.5, 1e-9));
        assert!(!trim.contains(4.0, 0.5, 1e-9));
    }

    #[test]
    fn test_add_edge_links_owners() {
        let mut shape = ShapeModel::new();
        let trim = TrimLoop::Polygon {
            outer: unit_square(),
            holes: vec![],
        };
        let a = shape.add_face(Surface::Plane(Plane::xy()), trim.clone());
        let b = shape.add_face(
            Surface::Plane(Plane::new(Point3d::new(0.0, 0.0, 1.0), Vec3::Z)),
            trim,
        );
        let key = shape.add_edge(
            EdgeCurve::Segment {
                start: Point3d::ORIGIN,
                end: Point3d::new(1.0, 0.0, 0.0),
            },
            &[a, b],
        );
        assert_eq!(shape.face(a as usize).edges, vec![key]);
        assert_eq!(shape.face(b as usize).edges, vec![key]);
        assert_eq!(shape.edge(key).owners, vec![a, b]);
    }

    #[test]
    fn test_segment_distance() {
        let seg = EdgeCurve::Segment {
            start: Point3d::ORIGIN,
            end: Point3d::new(2.0, 0.0, 0.0),
        };
        assert!((seg.distance_to_point(&Point3d::new(1.0, 3.0, 0.0)) - 3.0).abs() < 1e-12);
        // Beyond the end the distance is to the endpoint.
        assert!((seg.distance_to_point(&Point3d::new(5.0, 0.0, 0.0)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_face_bounding_box_planar() {
        let mut shape = ShapeModel::new();
        let trim = TrimLoop::Polygon {
            outer: unit_square(),
            holes: vec![],
        };
        shape.add_face(Surface::Plane(Plane::xy()), trim);
        let bbox = shape.face_bounding_box(0, 0.0);
        assert!((bbox.max.x - 1.0).abs() < 1e-12);
        assert!(bbox.max.z.abs() < 1e-12);
    }

    #[test]
    fn test_rect_face_bounding_box_contains_tilted_cylinder() {
        use crate::geometry::Cylinder;

        // A cylinder whose axis lines up with no coordinate axis; the
        // sampled grid alone would clip the surface near the chords.
        let cyl = Cylinder::new(Point3d::ORIGIN, Vec3::new(0.2, 1.0, 0.3), 1.0);
        let mut shape = ShapeModel::new();
        shape.add_face(
            Surface::Cylinder(cyl),
            TrimLoop::Rect {
                u: (0.0, TAU),
                v: (0.0, 2.0),
                wrap_u: true,
            },
        );
        let bbox = shape.face_bounding_box(0, 1e-4);
        for i in 0..256 {
            let u = TAU * i as f64 / 256.0;
            for j in 0..=16 {
                let v = 2.0 * j as f64 / 16.0;
                let p = cyl.evaluate(u, v);
                assert!(bbox.contains_point(&p), "surface point escaped at u={u} v={v}");
            }
        }
    }
}
