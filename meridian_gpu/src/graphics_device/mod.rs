/// Graphics device module - capabilities consumed from the platform layer

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod program;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use program::*;

// Mock graphics context for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
