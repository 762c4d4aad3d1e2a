use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A vector in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };
    pub const Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };
    pub const Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Returns a unit vector in the same direction, or `None` when the
    /// length is below `epsilon`.
    pub fn normalized(&self, epsilon: f64) -> Option<Self> {
        let len = self.length();
        if len < epsilon {
            None
        } else {
            Some(*self / len)
        }
    }

    /// Unit vector in the same direction. Panics on a near-zero vector;
    /// use [`Vec3::normalized`] when the input is not trusted.
    pub fn normalize(&self) -> Self {
        self.normalized(1e-12)
            .expect("cannot normalize a zero-length vector")
    }

    /// Angle between two vectors in radians, in `[0, pi]`.
    pub fn angle_to(&self, other: &Self) -> f64 {
        let denom = self.length() * other.length();
        if denom < 1e-12 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos()
    }

    /// True when the vectors are parallel or anti-parallel within
    /// `angular` radians.
    pub fn is_parallel_to(&self, other: &Self, angular: f64) -> bool {
        let angle = self.angle_to(other);
        angle <= angular || (std::f64::consts::PI - angle) <= angular
    }

    pub fn is_perpendicular_to(&self, other: &Self, angular: f64) -> bool {
        (self.angle_to(other) - std::f64::consts::FRAC_PI_2).abs() <= angular
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Self::Output {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;
    fn div(self, rhs: f64) -> Self::Output {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Self::Output {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_dot_and_cross() {
        assert!((Vec3::X.dot(&Vec3::Y)).abs() < 1e-12);
        let z = Vec3::X.cross(&Vec3::Y);
        assert!((z.x).abs() < 1e-12);
        assert!((z.y).abs() < 1e-12);
        assert!((z.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalized_zero_vector() {
        assert!(Vec3::ZERO.normalized(1e-12).is_none());
    }

    #[test]
    fn test_angle_to() {
        assert!((Vec3::X.angle_to(&Vec3::Y) - FRAC_PI_2).abs() < 1e-12);
        assert!((Vec3::X.angle_to(&-Vec3::X) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_is_parallel_to_antiparallel() {
        assert!(Vec3::Z.is_parallel_to(&-Vec3::Z, 1e-8));
        assert!(!Vec3::Z.is_parallel_to(&Vec3::X, 1e-8));
    }

    #[test]
    fn test_is_perpendicular_to() {
        assert!(Vec3::X.is_perpendicular_to(&Vec3::Z, 1e-8));
        assert!(!Vec3::X.is_perpendicular_to(&Vec3::X, 1e-8));
    }
}
