/// GpuProgram trait - the only shader capability the buffer core consumes

/// Linked GPU program
///
/// Shader compilation and uniforms live elsewhere. Program identity is the
/// identity of the `Arc` holding it.
pub trait GpuProgram: Send + Sync {
    /// Location of a vertex attribute, `None` if the program has no such input
    fn attribute_location(&self, name: &str) -> Option<u32>;
}
