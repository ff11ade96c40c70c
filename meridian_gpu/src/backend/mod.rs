/// Backend module - vertex array binding strategies per graphics API

pub mod vertex_array_backend;
pub mod gl_backend;
pub mod explicit_backend;

pub use vertex_array_backend::*;
pub use gl_backend::*;
pub use explicit_backend::*;

#[cfg(test)]
#[path = "vertex_array_backend_tests.rs"]
mod tests;
