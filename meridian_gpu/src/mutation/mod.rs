/// Mutation module - in-place patches of already uploaded geometry

pub mod attribute_mutator;
pub mod index_mutator;

pub use attribute_mutator::*;
pub use index_mutator::*;
