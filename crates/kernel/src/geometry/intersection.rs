use super::bbox::BoundingBox;
use super::curves::Ray;
use super::point::Point3d;
use super::surfaces::{Cylinder, Plane, Sphere, Surface};
use super::vector::Vec3;

/// A single intersection of a ray with a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySurfaceHit {
    pub point: Point3d,
    pub t: f64,
    pub normal: Vec3,
}

/// Roots of `a t^2 + b t + c = 0`, smallest first.
fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < 1e-14 {
        if b.abs() < 1e-14 {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sqrt_disc = disc.sqrt();
    let t0 = (-b - sqrt_disc) / (2.0 * a);
    let t1 = (-b + sqrt_disc) / (2.0 * a);
    if t0 <= t1 {
        vec![t0, t1]
    } else {
        vec![t1, t0]
    }
}

/// Intersect a ray with an infinite plane. Rays parallel to the plane
/// yield no hit, even when lying in it.
pub fn ray_plane(ray: &Ray, plane: &Plane) -> Option<RaySurfaceHit> {
    let denom = ray.direction.dot(&plane.normal);
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = (plane.origin - ray.origin).dot(&plane.normal) / denom;
    Some(RaySurfaceHit {
        point: ray.at(t),
        t,
        normal: plane.normal,
    })
}

pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Vec<RaySurfaceHit> {
    let oc = ray.origin - sphere.center;
    let a = ray.direction.length_squared();
    let b = 2.0 * oc.dot(&ray.direction);
    let c = oc.length_squared() - sphere.radius * sphere.radius;
    quadratic_roots(a, b, c)
        .into_iter()
        .map(|t| {
            let point = ray.at(t);
            RaySurfaceHit {
                point,
                t,
                normal: (point - sphere.center).normalize(),
            }
        })
        .collect()
}

pub fn ray_cylinder(ray: &Ray, cylinder: &Cylinder) -> Vec<RaySurfaceHit> {
    // Work in the component perpendicular to the axis.
    let axis = cylinder.axis;
    let oc = ray.origin - cylinder.origin;
    let d_perp = ray.direction - axis * ray.direction.dot(&axis);
    let oc_perp = oc - axis * oc.dot(&axis);
    let a = d_perp.length_squared();
    let b = 2.0 * oc_perp.dot(&d_perp);
    let c = oc_perp.length_squared() - cylinder.radius * cylinder.radius;
    quadratic_roots(a, b, c)
        .into_iter()
        .map(|t| {
            let point = ray.at(t);
            let v = (point - cylinder.origin).dot(&axis);
            let foot = cylinder.origin + axis * v;
            RaySurfaceHit {
                point,
                t,
                normal: (point - foot).normalize(),
            }
        })
        .collect()
}

/// All ray-surface intersections, unordered, including negative `t`.
/// Callers filter for the half-line they care about.
pub fn ray_surface(ray: &Ray, surface: &Surface) -> Vec<RaySurfaceHit> {
    match surface {
        Surface::Plane(p) => ray_plane(ray, p).into_iter().collect(),
        Surface::Cylinder(c) => ray_cylinder(ray, c),
        Surface::Sphere(s) => ray_sphere(ray, s),
    }
}

/// Slab test: does the ray hit the box anywhere at `t >= 0`?
pub fn ray_aabb(ray: &Ray, bbox: &BoundingBox) -> bool {
    let mut t_min = 0.0_f64;
    let mut t_max = f64::INFINITY;
    let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
    let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
    let lo = [bbox.min.x, bbox.min.y, bbox.min.z];
    let hi = [bbox.max.x, bbox.max.y, bbox.max.z];
    for axis in 0..3 {
        if dir[axis].abs() < 1e-14 {
            if origin[axis] < lo[axis] || origin[axis] > hi[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / dir[axis];
        let mut t0 = (lo[axis] - origin[axis]) * inv;
        let mut t1 = (hi[axis] - origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return false;
        }
    }
    true
}

/// Collapse crossings closer together than `tol` into one, returning the
/// surviving count. `ts` must be sorted ascending.
pub fn deduplicate_crossings(ts: &[f64], tol: f64) -> usize {
    let mut count = 0;
    let mut last: Option<f64> = None;
    for &t in ts {
        match last {
            Some(prev) if (t - prev).abs() <= tol => {}
            _ => {
                count += 1;
                last = Some(t);
            }
        }
    }
    count
}
