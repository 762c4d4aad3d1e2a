pub mod face;
pub mod membership;
pub mod ray;
pub mod solid;

pub use face::{FaceClassifier, FaceHit, SurfaceClassifier};
pub use membership::{Membership, MembershipMask};
pub use ray::{BoundaryHit, Lcg64, RayCaster, UniformSource};
pub use solid::SolidClassifier;
