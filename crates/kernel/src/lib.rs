pub mod boundary;
pub mod classify;
pub mod geometry;
pub mod spatial;

// Re-export the types most callers touch.
pub use boundary::{BoundarySource, ShapeModel};
pub use classify::{
    FaceClassifier, Lcg64, Membership, MembershipMask, RayCaster, SolidClassifier, UniformSource,
};
pub use spatial::{BvhIterator, BvhNode, BvhTree};

/// Tolerance configuration for classification queries.
///
/// `inaccuracy` is the user-facing geometric tolerance: gaps below it are
/// treated as coincidence. `precision` is the internal resolution used to
/// discard numerically meaningless values (near-zero ray parameters,
/// degenerate radii). `angular` bounds angle comparisons in radians.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    pub inaccuracy: f64,
    pub precision: f64,
    pub angular: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            inaccuracy: 1e-4,
            precision: 1e-7,
            angular: 1e-8,
        }
    }
}

impl Tolerance {
    /// Construct with explicit values. Non-positive tolerances are a
    /// programming error.
    pub fn new(inaccuracy: f64, precision: f64, angular: f64) -> Self {
        assert!(inaccuracy > 0.0, "inaccuracy must be positive");
        assert!(precision > 0.0, "precision must be positive");
        assert!(angular > 0.0, "angular tolerance must be positive");
        Self {
            inaccuracy,
            precision,
            angular,
        }
    }

    pub fn coincident(&self, gap: f64) -> bool {
        gap.abs() <= self.inaccuracy
    }

    pub fn is_zero(&self, value: f64) -> bool {
        value.abs() < self.precision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tolerance_ordering() {
        let tol = Tolerance::default();
        assert!(tol.precision < tol.inaccuracy);
    }

    #[test]
    fn test_coincident() {
        let tol = Tolerance::default();
        assert!(tol.coincident(5e-5));
        assert!(!tol.coincident(5e-4));
    }

    #[test]
    #[should_panic(expected = "inaccuracy must be positive")]
    fn test_non_positive_inaccuracy_panics() {
        let _ = Tolerance::new(0.0, 1e-7, 1e-8);
    }

    #[test]
    #[should_panic(expected = "precision must be positive")]
    fn test_non_positive_precision_panics() {
        let _ = Tolerance::new(1e-4, -1.0, 1e-8);
    }
}
