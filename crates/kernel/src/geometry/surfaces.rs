use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

use super::curves::Line3d;
use super::point::Point3d;
use super::vector::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceType {
    Plane,
    Cylinder,
    Sphere,
}

/// An infinite plane with an explicit uv frame.
///
/// The frame is carried so that trim loops of primitive faces can be
/// authored in known coordinates rather than whatever an orthonormal
/// completion happens to produce.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3d,
    pub normal: Vec3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
}

impl Plane {
    pub fn with_axes(origin: Point3d, normal: Vec3, u_axis: Vec3, v_axis: Vec3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
            u_axis: u_axis.normalize(),
            v_axis: v_axis.normalize(),
        }
    }

    /// Plane through `origin` with `normal`, uv frame completed
    /// arbitrarily.
    pub fn new(origin: Point3d, normal: Vec3) -> Self {
        let normal = normal.normalize();
        let helper = if normal.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let u_axis = normal.cross(&helper).normalize();
        let v_axis = normal.cross(&u_axis);
        Self {
            origin,
            normal,
            u_axis,
            v_axis,
        }
    }

    /// The z = 0 plane with the standard frame.
    pub fn xy() -> Self {
        Self::with_axes(Point3d::ORIGIN, Vec3::Z, Vec3::X, Vec3::Y)
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.origin + self.u_axis * u + self.v_axis * v
    }

    /// Signed distance from `point` to the plane.
    pub fn signed_distance(&self, point: &Point3d) -> f64 {
        (*point - self.origin).dot(&self.normal)
    }

    /// Parameters of the projection of `point` onto the plane, plus the
    /// out-of-plane gap.
    pub fn parameters_of(&self, point: &Point3d) -> (f64, f64, f64) {
        let d = *point - self.origin;
        let gap = d.dot(&self.normal).abs();
        (d.dot(&self.u_axis), d.dot(&self.v_axis), gap)
    }
}

/// An infinite right circular cylinder with an explicit angular frame.
///
/// `u` is the angle around `axis` measured from `ref_dir`, wrapped to
/// `[0, tau)`. `v` is the height along `axis` from `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cylinder {
    pub origin: Point3d,
    pub axis: Vec3,
    pub radius: f64,
    pub ref_dir: Vec3,
}

impl Cylinder {
    pub fn with_frame(origin: Point3d, axis: Vec3, radius: f64, ref_dir: Vec3) -> Self {
        let axis = axis.normalize();
        // Project ref_dir into the plane perpendicular to the axis.
        let ref_dir = (ref_dir - axis * ref_dir.dot(&axis)).normalize();
        Self {
            origin,
            axis,
            radius,
            ref_dir,
        }
    }

    pub fn new(origin: Point3d, axis: Vec3, radius: f64) -> Self {
        let axis_n = axis.normalize();
        let helper = if axis_n.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
        let ref_dir = axis_n.cross(&helper).cross(&axis_n);
        Self::with_frame(origin, axis, radius, ref_dir)
    }

    fn y_dir(&self) -> Vec3 {
        self.axis.cross(&self.ref_dir)
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let radial = self.ref_dir * u.cos() + self.y_dir() * u.sin();
        self.origin + radial * self.radius + self.axis * v
    }

    /// Outward normal at the given parameters.
    pub fn normal_at(&self, u: f64, _v: f64) -> Vec3 {
        self.ref_dir * u.cos() + self.y_dir() * u.sin()
    }

    pub fn axis_line(&self) -> Line3d {
        Line3d::new(self.origin, self.axis)
    }

    /// Parameters of the projection of `point` onto the cylinder, plus
    /// the radial gap.
    pub fn parameters_of(&self, point: &Point3d) -> (f64, f64, f64) {
        let d = *point - self.origin;
        let v = d.dot(&self.axis);
        let radial = d - self.axis * v;
        let gap = (radial.length() - self.radius).abs();
        let mut u = radial.dot(&self.y_dir()).atan2(radial.dot(&self.ref_dir));
        if u < 0.0 {
            u += TAU;
        }
        (u, v, gap)
    }

    /// Same axis line and radius, within the given tolerances. Used to
    /// decide whether two wall faces bound the same hole.
    pub fn is_coaxial_with(&self, other: &Cylinder, angular: f64, dist_tol: f64) -> bool {
        self.axis.is_parallel_to(&other.axis, angular)
            && self.axis_line().distance_to_point(&other.origin) <= dist_tol
            && (self.radius - other.radius).abs() <= dist_tol
    }
}

/// A full sphere parameterized in the global frame: `u` is azimuth,
/// `v` is latitude in `[-pi/2, pi/2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Point3d,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point3d, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        let cv = v.cos();
        self.center
            + Vec3::new(cv * u.cos(), cv * u.sin(), v.sin()) * self.radius
    }

    pub fn normal_at(&self, u: f64, v: f64) -> Vec3 {
        let cv = v.cos();
        Vec3::new(cv * u.cos(), cv * u.sin(), v.sin())
    }

    pub fn parameters_of(&self, point: &Point3d) -> (f64, f64, f64) {
        let d = *point - self.center;
        let len = d.length();
        let gap = (len - self.radius).abs();
        if len < 1e-12 {
            return (0.0, 0.0, self.radius);
        }
        let mut u = d.y.atan2(d.x);
        if u < 0.0 {
            u += TAU;
        }
        let v = (d.z / len).clamp(-1.0, 1.0).asin();
        (u, v, gap)
    }
}

/// The analytic surfaces the boundary model understands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
    Sphere(Sphere),
}

impl Surface {
    pub fn surface_type(&self) -> SurfaceType {
        match self {
            Surface::Plane(_) => SurfaceType::Plane,
            Surface::Cylinder(_) => SurfaceType::Cylinder,
            Surface::Sphere(_) => SurfaceType::Sphere,
        }
    }

    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        match self {
            Surface::Plane(p) => p.evaluate(u, v),
            Surface::Cylinder(c) => c.evaluate(u, v),
            Surface::Sphere(s) => s.evaluate(u, v),
        }
    }

    pub fn normal_at(&self, u: f64, v: f64) -> Vec3 {
        match self {
            Surface::Plane(p) => p.normal,
            Surface::Cylinder(c) => c.normal_at(u, v),
            Surface::Sphere(s) => s.normal_at(u, v),
        }
    }

    /// Project `point` onto the surface: `(u, v, gap)` where `gap` is
    /// the distance from the point to its projection.
    pub fn parameters_of(&self, point: &Point3d) -> (f64, f64, f64) {
        match self {
            Surface::Plane(p) => p.parameters_of(point),
            Surface::Cylinder(c) => c.parameters_of(point),
            Surface::Sphere(s) => s.parameters_of(point),
        }
    }

    /// A surface whose defining radius has collapsed carries no area.
    pub fn is_degenerate(&self, precision: f64) -> bool {
        match self {
            Surface::Plane(_) => false,
            Surface::Cylinder(c) => c.radius < precision,
            Surface::Sphere(s) => s.radius < precision,
        }
    }

    /// A uv step that moves roughly `distance` along the surface, used
    /// when probing a short distance away from a point on the surface.
    pub fn parameter_step(&self, distance: f64) -> (f64, f64) {
        match self {
            Surface::Plane(_) => (distance, distance),
            Surface::Cylinder(c) => (distance / c.radius.max(1e-12), distance),
            Surface::Sphere(s) => {
                let step = distance / s.radius.max(1e-12);
                (step, step)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_plane_parameters_roundtrip() {
        let plane = Plane::with_axes(Point3d::new(1.0, 2.0, 3.0), Vec3::Z, Vec3::X, Vec3::Y);
        let p = plane.evaluate(0.7, -1.3);
        let (u, v, gap) = plane.parameters_of(&p);
        assert_relative_eq!(u, 0.7, epsilon = 1e-12);
        assert_relative_eq!(v, -1.3, epsilon = 1e-12);
        assert!(gap < 1e-12);
    }

    #[test]
    fn test_plane_gap() {
        let plane = Plane::xy();
        let (_, _, gap) = plane.parameters_of(&Point3d::new(0.0, 0.0, 2.5));
        assert_relative_eq!(gap, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_parameters_roundtrip() {
        let cyl = Cylinder::with_frame(Point3d::ORIGIN, Vec3::Z, 2.0, Vec3::X);
        let p = cyl.evaluate(1.1, 3.0);
        let (u, v, gap) = cyl.parameters_of(&p);
        assert_relative_eq!(u, 1.1, epsilon = 1e-12);
        assert_relative_eq!(v, 3.0, epsilon = 1e-12);
        assert!(gap < 1e-12);
    }

    #[test]
    fn test_cylinder_u_wraps_to_positive() {
        let cyl = Cylinder::with_frame(Point3d::ORIGIN, Vec3::Z, 1.0, Vec3::X);
        // A point at negative y maps into (pi, tau), not a negative angle.
        let (u, _, _) = cyl.parameters_of(&Point3d::new(0.0, -1.0, 0.0));
        assert_relative_eq!(u, 3.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_cylinder_coaxial() {
        let a = Cylinder::with_frame(Point3d::ORIGIN, Vec3::Z, 1.5, Vec3::X);
        let b = Cylinder::with_frame(Point3d::new(0.0, 0.0, 7.0), -Vec3::Z, 1.5, Vec3::Y);
        let c = Cylinder::with_frame(Point3d::new(3.0, 0.0, 0.0), Vec3::Z, 1.5, Vec3::X);
        let d = Cylinder::with_frame(Point3d::ORIGIN, Vec3::Z, 2.0, Vec3::X);
        assert!(a.is_coaxial_with(&b, 1e-8, 1e-6));
        assert!(!a.is_coaxial_with(&c, 1e-8, 1e-6));
        assert!(!a.is_coaxial_with(&d, 1e-8, 1e-6));
    }

    #[test]
    fn test_sphere_parameters() {
        let sphere = Sphere::new(Point3d::ORIGIN, 2.0);
        let (u, v, gap) = sphere.parameters_of(&Point3d::new(0.0, 0.0, 2.0));
        assert_relative_eq!(v, FRAC_PI_2, epsilon = 1e-12);
        assert!(gap < 1e-12);
        let (u2, _, _) = sphere.parameters_of(&Point3d::new(-2.0, 0.0, 0.0));
        assert_relative_eq!(u2, PI, epsilon = 1e-12);
        let _ = u;
    }

    #[test]
    fn test_degenerate_surfaces() {
        let tol = 1e-7;
        assert!(Surface::Cylinder(Cylinder::new(Point3d::ORIGIN, Vec3::Z, 0.0)).is_degenerate(tol));
        assert!(!Surface::Sphere(Sphere::new(Point3d::ORIGIN, 1.0)).is_degenerate(tol));
        assert!(!Surface::Plane(Plane::xy()).is_degenerate(tol));
    }
}
