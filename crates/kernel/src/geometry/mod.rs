pub mod bbox;
pub mod curves;
pub mod intersection;
pub mod point;
pub mod surfaces;
pub mod vector;

pub use bbox::BoundingBox;
pub use curves::{Circle3d, Line3d, Ray};
pub use intersection::RaySurfaceHit;
pub use point::{Point2d, Point3d};
pub use surfaces::{Cylinder, Plane, Sphere, Surface, SurfaceType};
pub use vector::Vec3;
