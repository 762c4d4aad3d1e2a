pub mod iterator;
pub mod tree;

pub use iterator::BvhIterator;
pub use tree::{BvhNode, BvhTree, LEAF};
