/// GraphicsContext trait - the per-thread graphics API surface
///
/// The platform layer (windowing, GL loader, Metal/Vulkan device) implements
/// this trait. Everything the buffer core needs from the GPU goes through it
/// or through the objects it creates.

use bitflags::bitflags;

use crate::error::Result;
use crate::graphics_device::{BufferDesc, BufferUsage, GpuBuffer, IndexType};
use crate::vertex_layout::AttributeDecl;

// ============================================================================
// API version and device capabilities
// ============================================================================

/// Graphics API driving a context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// No recognized API (context not initialized)
    Invalid,
    /// GL without cached vertex state in core (ES2 class)
    ImmediateGl,
    /// GL with cached vertex state in core (ES3 class)
    CachedStateGl,
    /// Modern explicit API (Metal/Vulkan class)
    Explicit,
}

impl ApiVersion {
    /// Whether buffers are bound through the GL binding model
    pub fn is_gl(&self) -> bool {
        matches!(self, ApiVersion::ImmediateGl | ApiVersion::CachedStateGl)
    }
}

bitflags! {
    /// Capabilities reported by the device-capability query
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceCaps: u32 {
        /// Vertex array objects are available
        const CACHED_VERTEX_STATE = 1 << 0;
        /// GPU resources must be created on the thread that renders them
        const DEFERRED_UPLOAD = 1 << 1;
        /// 32-bit index buffers are available
        const UINT32_INDICES = 1 << 2;
    }
}

/// Primitive topology of an indexed draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    LineList,
}

impl PrimitiveTopology {
    /// Topology for the `draw_as_line` switch used by render calls
    pub fn from_draw_as_line(draw_as_line: bool) -> Self {
        if draw_as_line {
            PrimitiveTopology::LineList
        } else {
            PrimitiveTopology::TriangleList
        }
    }
}

/// An attribute declaration resolved to a program location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundAttribute {
    pub location: u32,
    pub decl: AttributeDecl,
}

// ============================================================================
// Cached vertex state
// ============================================================================

/// GPU-side object recording buffer/attribute bindings (a VAO in GL terms)
///
/// Released when dropped.
pub trait VertexState: Send + Sync {
    /// Make this vertex state current
    fn bind(&self);
}

// ============================================================================
// GraphicsContext trait
// ============================================================================

/// Graphics context bound to the calling thread
pub trait GraphicsContext {
    /// API driving this context
    fn api_version(&self) -> ApiVersion;

    /// Capabilities of the underlying device
    ///
    /// Queried on every call that depends on them, never cached.
    fn capabilities(&self) -> DeviceCaps;

    /// Allocate a GPU buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Box<dyn GpuBuffer>>;

    /// Clear the current binding point for buffers of `usage`
    fn unbind_buffer(&mut self, usage: BufferUsage);

    /// Create a cached vertex-state object
    fn create_vertex_state(&mut self) -> Result<Box<dyn VertexState>>;

    /// Deactivate whatever vertex state is current
    fn unbind_vertex_state(&mut self);

    /// Enable the vertex attribute at `location`
    fn enable_vertex_attribute(&mut self, location: u32);

    /// Point the attribute at `location` into the currently bound vertex buffer
    fn vertex_attribute_pointer(&mut self, location: u32, decl: &AttributeDecl);

    /// Attach a vertex buffer to a slot of the explicit-API vertex descriptor
    ///
    /// # Arguments
    ///
    /// * `slot` - Vertex buffer slot
    /// * `buffer` - Buffer providing the stream
    /// * `attributes` - Attributes read from this slot with their locations
    fn set_vertex_buffer(
        &mut self,
        slot: u32,
        buffer: &dyn GpuBuffer,
        attributes: &[BoundAttribute],
    ) -> Result<()>;

    /// Issue an indexed draw call with the currently bound index buffer
    ///
    /// # Arguments
    ///
    /// * `topology` - Triangle or line list
    /// * `index_type` - Width of the bound indices
    /// * `first_index` - First index to read
    /// * `index_count` - Number of indices to draw
    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_type: IndexType,
        first_index: u32,
        index_count: u32,
    ) -> Result<()>;
}
