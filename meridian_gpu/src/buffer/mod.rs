/// Buffer module - growable GPU buffers, index buffers and layout-keyed maps

pub mod data_buffer;
pub mod index_buffer;
pub mod buffer_map;

pub use data_buffer::*;
pub use index_buffer::*;
pub use buffer_map::*;
