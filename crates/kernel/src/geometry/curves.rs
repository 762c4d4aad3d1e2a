use serde::{Deserialize, Serialize};

use super::point::Point3d;
use super::vector::Vec3;

/// An infinite line through `origin` with unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3d {
    pub origin: Point3d,
    pub direction: Vec3,
}

impl Line3d {
    pub fn new(origin: Point3d, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn evaluate(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }

    pub fn closest_point(&self, point: &Point3d) -> Point3d {
        let t = (*point - self.origin).dot(&self.direction);
        self.evaluate(t)
    }

    pub fn distance_to_point(&self, point: &Point3d) -> f64 {
        point.distance_to(&self.closest_point(point))
    }

    /// Shortest distance between two lines. Parallel lines fall back to
    /// point-to-line distance.
    pub fn distance_to_line(&self, other: &Line3d) -> f64 {
        let cross = self.direction.cross(&other.direction);
        let cross_len = cross.length();
        if cross_len < 1e-12 {
            return self.distance_to_point(&other.origin);
        }
        let w = other.origin - self.origin;
        (w.dot(&cross) / cross_len).abs()
    }
}

/// A half-line through `origin` with unit `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3d,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Point3d, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn at(&self, t: f64) -> Point3d {
        self.origin + self.direction * t
    }
}

/// A circle embedded in 3D, given by center, unit plane normal and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle3d {
    pub center: Point3d,
    pub normal: Vec3,
    pub radius: f64,
}

impl Circle3d {
    pub fn new(center: Point3d, normal: Vec3, radius: f64) -> Self {
        Self {
            center,
            normal: normal.normalize(),
            radius,
        }
    }

    /// Distance from `point` to the nearest point on the circle itself
    /// (the rim, not the disk).
    pub fn distance_to_point(&self, point: &Point3d) -> f64 {
        let v = *point - self.center;
        let h = v.dot(&self.normal);
        let radial = v - self.normal * h;
        let radial_len = radial.length();
        if radial_len < 1e-12 {
            // On the axis: every rim point is equidistant.
            return (h * h + self.radius * self.radius).sqrt();
        }
        let dr = radial_len - self.radius;
        (h * h + dr * dr).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_closest_point() {
        let line = Line3d::new(Point3d::ORIGIN, Vec3::X);
        let p = Point3d::new(3.0, 4.0, 0.0);
        let q = line.closest_point(&p);
        assert!((q.x - 3.0).abs() < 1e-12);
        assert!(q.y.abs() < 1e-12);
        assert!((line.distance_to_point(&p) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_distance_parallel() {
        let a = Line3d::new(Point3d::ORIGIN, Vec3::Z);
        let b = Line3d::new(Point3d::new(2.0, 0.0, 5.0), Vec3::Z);
        assert!((a.distance_to_line(&b) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_distance_skew() {
        let a = Line3d::new(Point3d::ORIGIN, Vec3::X);
        let b = Line3d::new(Point3d::new(0.0, 0.0, 3.0), Vec3::Y);
        assert!((a.distance_to_line(&b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Point3d::ORIGIN, Vec3::new(2.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p.x - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_distance_on_plane() {
        let circle = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 2.0);
        // A point in the circle's plane, 5 from center: distance is 3.
        let p = Point3d::new(5.0, 0.0, 0.0);
        assert!((circle.distance_to_point(&p) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_circle_distance_on_axis() {
        let circle = Circle3d::new(Point3d::ORIGIN, Vec3::Z, 3.0);
        let p = Point3d::new(0.0, 0.0, 4.0);
        assert!((circle.distance_to_point(&p) - 5.0).abs() < 1e-12);
    }
}
