pub mod primitives;
pub mod shape;

pub use shape::{
    BoundarySource, EdgeCurve, EdgeKey, EdgeRecord, FaceRecord, ShapeModel, TrimLoop,
};
