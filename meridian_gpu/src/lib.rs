/*!
# Meridian GPU

Vertex and index buffer management for the Meridian map renderer.

This crate owns the CPU-to-GPU path for geometry batches: growable attribute
and index buffers, in-place patching of already uploaded data, and indexed
draws through a per-API binding strategy. The graphics API itself is consumed
through traits implemented by the platform layer.

## Architecture

- **GraphicsContext**: per-thread graphics API surface (buffers, vertex state, draws)
- **VertexLayoutKey**: content-compared descriptor of one attribute stream
- **DataBuffer / IndexBuffer**: growable buffers, CPU-shadowed until moved to GPU
- **VertexArrayBackend**: GL (cached or manual binding) and explicit-API strategies
- **VertexArrayBuffer**: the batch orchestrator (upload, preflush, build, render, mutate)
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod vertex_layout;
pub mod buffer;
pub mod mutation;
pub mod backend;
pub mod vertex_array_buffer;

// Main meridian namespace module
pub mod meridian {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Orchestrator
    pub use crate::vertex_array_buffer::{VertexArrayBuffer, VertexArrayBufferDesc};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Capabilities consumed from the platform layer
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Vertex layout sub-module
    pub mod layout {
        pub use crate::vertex_layout::*;
    }

    // Buffer sub-module
    pub mod buffer {
        pub use crate::buffer::*;
    }

    // Mutation sub-module
    pub mod mutation {
        pub use crate::mutation::*;
    }

    // Backend sub-module
    pub mod backend {
        pub use crate::backend::*;
    }
}
