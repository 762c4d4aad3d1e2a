use super::membership::Membership;
use crate::boundary::FaceRecord;
use crate::geometry::Point3d;
use crate::Tolerance;

/// Outcome of projecting a point onto a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    pub membership: Membership,
    pub u: f64,
    pub v: f64,
    /// Distance from the query point to its surface projection.
    pub gap: f64,
}

/// Classifies points against one trimmed face.
///
/// A point is `On` when it lies on the carrier surface within the
/// inaccuracy tolerance and its projection falls inside the trim;
/// otherwise it is `Out`. A face never answers `In`.
pub struct FaceClassifier<'a> {
    face: &'a FaceRecord,
    tol: Tolerance,
}

impl<'a> FaceClassifier<'a> {
    pub fn new(face: &'a FaceRecord, tol: Tolerance) -> Self {
        assert!(
            !face.surface.is_degenerate(tol.precision),
            "cannot classify against a degenerate surface"
        );
        Self { face, tol }
    }

    pub fn classify(&self, point: &Point3d) -> FaceHit {
        let (u, v, gap) = self.face.surface.parameters_of(point);
        let membership = if self.tol.coincident(gap) && self.face.trim.contains(u, v, self.tol.precision)
        {
            Membership::On
        } else {
            Membership::Out
        };
        FaceHit {
            membership,
            u,
            v,
            gap,
        }
    }
}

/// The trim-free variant: classifies against a bare surface, so any
/// point within tolerance of the carrier is `On`.
pub struct SurfaceClassifier {
    surface: crate::geometry::Surface,
    tol: Tolerance,
}

impl SurfaceClassifier {
    pub fn new(surface: crate::geometry::Surface, tol: Tolerance) -> Self {
        assert!(
            !surface.is_degenerate(tol.precision),
            "cannot classify against a degenerate surface"
        );
        Self { surface, tol }
    }

    pub fn classify(&self, point: &Point3d) -> FaceHit {
        let (u, v, gap) = self.surface.parameters_of(point);
        let membership = if self.tol.coincident(gap) {
            Membership::On
        } else {
            Membership::Out
        };
        FaceHit {
            membership,
            u,
            v,
            gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::primitives::make_drilled_block;
    use crate::boundary::BoundarySource;

    fn classify_on(shape: &crate::ShapeModel, ordinal: usize, point: Point3d) -> Membership {
        FaceClassifier::new(shape.face(ordinal), Tolerance::default())
            .classify(&point)
            .membership
    }

    #[test]
    fn test_point_on_top_face() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        let m = classify_on(&shape, 1, Point3d::new(2.0, 2.0, 5.0));
        assert_eq!(m, Membership::On);
    }

    #[test]
    fn test_point_off_surface() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        let m = classify_on(&shape, 1, Point3d::new(2.0, 2.0, 5.1));
        assert_eq!(m, Membership::Out);
    }

    #[test]
    fn test_point_in_bore_opening_is_out() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        // On the top plane but inside the trimmed-away bore.
        let m = classify_on(&shape, 1, Point3d::new(5.0, 5.0, 5.0));
        assert_eq!(m, Membership::Out);
    }

    #[test]
    fn test_point_on_wall_face() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        // On the bore wall at u = pi/2 on wall half 6.
        let m = classify_on(&shape, 6, Point3d::new(5.0, 6.0, 2.5));
        assert_eq!(m, Membership::On);
        // Same cylinder, opposite half.
        let m = classify_on(&shape, 6, Point3d::new(5.0, 4.0, 2.5));
        assert_eq!(m, Membership::Out);
    }

    #[test]
    fn test_surface_classifier_ignores_trim() {
        let shape = make_drilled_block(10.0, 10.0, 5.0, &[(5.0, 5.0, 1.0)]);
        let surface = shape.face(1).surface;
        let classifier = SurfaceClassifier::new(surface, Tolerance::default());
        // Inside the trimmed-away bore, but still on the carrier plane.
        let hit = classifier.classify(&Point3d::new(5.0, 5.0, 5.0));
        assert_eq!(hit.membership, Membership::On);
    }

    #[test]
    #[should_panic(expected = "degenerate")]
    fn test_degenerate_surface_panics() {
        use crate::boundary::TrimLoop;
        use crate::geometry::{Cylinder, Surface, Vec3};
        let face = FaceRecord {
            surface: Surface::Cylinder(Cylinder::new(Point3d::ORIGIN, Vec3::Z, 0.0)),
            trim: TrimLoop::Rect {
                u: (0.0, 1.0),
                v: (0.0, 1.0),
                wrap_u: false,
            },
            edges: vec![],
        };
        let _ = FaceClassifier::new(&face, Tolerance::default());
    }
}
