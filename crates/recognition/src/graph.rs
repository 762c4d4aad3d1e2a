use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::f64::consts::TAU;

use recog_kernel::boundary::{BoundarySource, EdgeCurve, FaceRecord};
use recog_kernel::geometry::{Point3d, Surface};
use recog_kernel::Tolerance;
use tracing::{info, instrument};

use crate::attributes::{ArcAttribute, AttributeKind, Vexity};
use crate::types::FaceIndex;

static EMPTY: BTreeSet<FaceIndex> = BTreeSet::new();

type ArcKey = (FaceIndex, FaceIndex);

fn arc_key(a: FaceIndex, b: FaceIndex) -> ArcKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Attributed adjacency graph over the faces of a boundary model.
///
/// Nodes are faces, addressed one-based. Two faces are adjacent exactly
/// when they share an edge referenced by those two faces and no others:
/// free boundary edges (one owner) and non-manifold edges (three or
/// more owners) contribute no arc. Every face in scope has an adjacency
/// entry, so isolated faces answer an empty neighbor set rather than a
/// missing one.
pub struct Aag {
    faces: Vec<FaceRecord>,
    adjacency: HashMap<FaceIndex, BTreeSet<FaceIndex>>,
    attributes: HashMap<ArcKey, BTreeMap<AttributeKind, ArcAttribute>>,
    tol: Tolerance,
}

impl Aag {
    /// Build the graph over every face of the model.
    #[instrument(skip(source))]
    pub fn build(source: &dyn BoundarySource, tol: Tolerance) -> Self {
        Self::build_impl(source, tol, None)
    }

    /// Build the sub-graph over a face selection: arcs appear only when
    /// both endpoints are selected.
    #[instrument(skip(source, selected))]
    pub fn build_selected(
        source: &dyn BoundarySource,
        tol: Tolerance,
        selected: &BTreeSet<FaceIndex>,
    ) -> Self {
        Self::build_impl(source, tol, Some(selected))
    }

    fn build_impl(
        source: &dyn BoundarySource,
        tol: Tolerance,
        selected: Option<&BTreeSet<FaceIndex>>,
    ) -> Self {
        let faces: Vec<FaceRecord> = (0..source.face_count())
            .map(|ordinal| source.face(ordinal).clone())
            .collect();

        let in_scope = |index: FaceIndex| selected.map_or(true, |s| s.contains(&index));

        let mut adjacency: HashMap<FaceIndex, BTreeSet<FaceIndex>> = HashMap::new();
        for ordinal in 0..faces.len() {
            let index = FaceIndex::from_ordinal(ordinal);
            if in_scope(index) {
                adjacency.insert(index, BTreeSet::new());
            }
        }

        let mut attributes: HashMap<ArcKey, BTreeMap<AttributeKind, ArcAttribute>> =
            HashMap::new();
        for key in source.edge_keys() {
            let record = source.edge(key);
            let mut owners: Vec<u32> = record.owners.clone();
            owners.sort_unstable();
            owners.dedup();
            if owners.len() != 2 {
                continue;
            }
            let a = FaceIndex::from_ordinal(owners[0] as usize);
            let b = FaceIndex::from_ordinal(owners[1] as usize);
            if !in_scope(a) || !in_scope(b) {
                continue;
            }
            if let Some(set) = adjacency.get_mut(&a) {
                set.insert(b);
            }
            if let Some(set) = adjacency.get_mut(&b) {
                set.insert(a);
            }
            let entry = attributes
                .entry(arc_key(a, b))
                .or_default()
                .entry(AttributeKind::CommonEdges)
                .or_insert_with(|| ArcAttribute::CommonEdges(BTreeSet::new()));
            if let ArcAttribute::CommonEdges(edges) = entry {
                edges.insert(key);
            }
        }

        // One vexity per arc, computed from a shared edge.
        let arc_keys: Vec<ArcKey> = attributes.keys().copied().collect();
        for (a, b) in arc_keys {
            let edge_key = match attributes
                .get(&(a, b))
                .and_then(|attrs| attrs.get(&AttributeKind::CommonEdges))
            {
                Some(ArcAttribute::CommonEdges(edges)) => match edges.iter().next() {
                    Some(&key) => key,
                    None => continue,
                },
                _ => continue,
            };
            let vexity = arc_vexity(
                &faces[a.to_ordinal()],
                &faces[b.to_ordinal()],
                &source.edge(edge_key).curve,
                &tol,
            );
            if let Some(attrs) = attributes.get_mut(&(a, b)) {
                attrs.insert(AttributeKind::Vexity, ArcAttribute::Vexity(vexity));
            }
        }

        let arc_count = attributes.len();
        info!(
            faces = faces.len(),
            arcs = arc_count,
            selected = selected.is_some(),
            "built adjacency graph"
        );
        Self {
            faces,
            adjacency,
            attributes,
            tol,
        }
    }

    /// Splice caller-asserted mate relations in as extra arcs. The
    /// relations are taken at face value; no geometry is checked. Arcs
    /// added this way carry no attributes.
    pub fn with_mates(mut self, relations: &[(FaceIndex, FaceIndex)]) -> Self {
        for &(a, b) in relations {
            assert!(
                a.to_ordinal() < self.faces.len() && b.to_ordinal() < self.faces.len(),
                "mate relation references a face outside the model"
            );
            assert!(a != b, "mate relation must join two distinct faces");
            self.adjacency.entry(a).or_default().insert(b);
            self.adjacency.entry(b).or_default().insert(a);
        }
        self
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The face record behind an index. Panics when the index is out of
    /// range for the model.
    pub fn face(&self, index: FaceIndex) -> &FaceRecord {
        &self.faces[index.to_ordinal()]
    }

    pub fn contains(&self, index: FaceIndex) -> bool {
        self.adjacency.contains_key(&index)
    }

    /// Neighbor set of a face. Faces without an entry (out of selection
    /// scope) answer the empty set.
    pub fn neighbors(&self, index: FaceIndex) -> &BTreeSet<FaceIndex> {
        self.adjacency.get(&index).unwrap_or(&EMPTY)
    }

    pub fn adjacency(&self) -> &HashMap<FaceIndex, BTreeSet<FaceIndex>> {
        &self.adjacency
    }

    pub fn attribute(
        &self,
        a: FaceIndex,
        b: FaceIndex,
        kind: AttributeKind,
    ) -> Option<&ArcAttribute> {
        self.attributes.get(&arc_key(a, b))?.get(&kind)
    }

    pub fn tolerance(&self) -> &Tolerance {
        &self.tol
    }
}

// ─── Vexity probing ──────────────────────────────────────────────────────────

/// Points along an edge usable as probes. Arc carriers store the full
/// circle, so several stations are offered and callers keep the ones
/// that land on both faces.
fn edge_sample_points(curve: &EdgeCurve) -> Vec<Point3d> {
    match curve {
        EdgeCurve::Segment { .. } => vec![curve.midpoint()],
        EdgeCurve::Arc(circle) => {
            let helper = if circle.normal.x.abs() < 0.9 {
                recog_kernel::geometry::Vec3::X
            } else {
                recog_kernel::geometry::Vec3::Y
            };
            let x_dir = circle.normal.cross(&helper).normalize();
            let y_dir = circle.normal.cross(&x_dir);
            (0..8)
                .map(|i| {
                    let angle = TAU * i as f64 / 8.0;
                    circle.center
                        + (x_dir * angle.cos() + y_dir * angle.sin()) * circle.radius
                })
                .collect()
        }
    }
}

/// Decide the vexity of the arc between two faces from one shared edge.
///
/// A probe point is stepped a short distance off the edge into face `b`
/// and its offset is measured along face `a`'s normal: positive means
/// the neighbor climbs into the material side, so the edge is concave.
/// Planes carry an authored orientation, so when exactly one face is
/// planar it serves as the normal reference.
fn arc_vexity(
    face_a: &FaceRecord,
    face_b: &FaceRecord,
    curve: &EdgeCurve,
    tol: &Tolerance,
) -> Vexity {
    let a_planar = matches!(face_a.surface, Surface::Plane(_));
    let b_planar = matches!(face_b.surface, Surface::Plane(_));
    if !a_planar && b_planar {
        return arc_vexity(face_b, face_a, curve, tol);
    }

    let probe = (tol.inaccuracy * 100.0).max(1e-3);
    let threshold = probe * 0.5;

    for station in edge_sample_points(curve) {
        let (ua, va, gap_a) = face_a.surface.parameters_of(&station);
        let (ub, vb, gap_b) = face_b.surface.parameters_of(&station);
        if gap_a > tol.inaccuracy || gap_b > tol.inaccuracy {
            continue;
        }
        if !face_a.trim.contains(ua, va, tol.precision)
            || !face_b.trim.contains(ub, vb, tol.precision)
        {
            continue;
        }
        let normal = face_a.surface.normal_at(ua, va);
        let (du, dv) = face_b.surface.parameter_step(probe);
        let candidates = [
            (ub + du, vb),
            (ub - du, vb),
            (ub, vb + dv),
            (ub, vb - dv),
        ];
        for (cu, cv) in candidates {
            if !face_b.trim.contains(cu, cv, tol.precision) {
                continue;
            }
            let q = face_b.surface.evaluate(cu, cv);
            // Steps that slide along the edge instead of leaving it say
            // nothing about the dihedral.
            if curve.distance_to_point(&q) < probe * 0.5 {
                continue;
            }
            let s = (q - station).dot(&normal);
            return if s > threshold {
                Vexity::Concave
            } else if s < -threshold {
                Vexity::Convex
            } else {
                Vexity::Smooth
            };
        }
    }
    Vexity::Undefined
}
