/// Vertex layout module - immutable keys describing attribute streams

pub mod layout_key;

pub use layout_key::*;
