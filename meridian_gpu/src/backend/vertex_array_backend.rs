/// VertexArrayBackend trait - per-API binding strategy
///
/// A backend owns whatever the graphics API needs to bind attribute streams
/// and issue indexed draws. The orchestrator picks one on its first build,
/// based on the context's API version, and keeps it for its whole lifetime.

use std::sync::Arc;

use crate::buffer::BufferMap;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::graphics_device::{ApiVersion, GpuProgram, GraphicsContext, IndexType};
use crate::backend::{ExplicitVertexArrayBackend, GlVertexArrayBackend};

/// Contiguous range of indices to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicesRange {
    /// First index
    pub start: u32,
    /// Number of indices
    pub count: u32,
}

impl IndicesRange {
    pub fn new(start: u32, count: u32) -> Self {
        Self { start, count }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Binding strategy of one graphics API
pub trait VertexArrayBackend: Send {
    /// Prepare cached vertex state for `program`
    ///
    /// Returns true when the caller must capture the static bindings again,
    /// false when the existing state is still valid or the platform keeps no
    /// cached vertex state.
    fn build(&mut self, ctx: &mut dyn GraphicsContext, program: &Arc<dyn GpuProgram>) -> Result<bool>;

    /// Activate the cached vertex state
    ///
    /// Returns false when the platform needs buffers bound by hand on every draw.
    fn bind(&self, ctx: &mut dyn GraphicsContext) -> Result<bool>;

    /// Deactivate the cached vertex state, if any
    fn unbind(&self, ctx: &mut dyn GraphicsContext);

    /// Bind every buffer of `buffers` with its attributes
    fn bind_buffers(&mut self, ctx: &mut dyn GraphicsContext, buffers: &BufferMap) -> Result<()>;

    /// Issue an indexed draw over `range` with the bound index buffer
    fn render_range(
        &self,
        ctx: &mut dyn GraphicsContext,
        draw_as_line: bool,
        range: IndicesRange,
        index_type: IndexType,
    ) -> Result<()>;
}

/// Create the backend matching `api_version`
pub fn create_backend(api_version: ApiVersion) -> Result<Box<dyn VertexArrayBackend>> {
    let backend: Box<dyn VertexArrayBackend> = match api_version {
        ApiVersion::ImmediateGl | ApiVersion::CachedStateGl => Box::new(GlVertexArrayBackend::new()),
        ApiVersion::Explicit => Box::new(ExplicitVertexArrayBackend::new()),
        ApiVersion::Invalid => {
            engine_bail!("meridian::backend", UnsupportedApi,
                "no vertex array backend for API version {:?}", api_version);
        }
    };
    engine_debug!("meridian::backend", "Selected vertex array backend for {:?}", api_version);
    Ok(backend)
}

/// Program identity, ignoring vtable pointers
pub(crate) fn same_program(a: &Arc<dyn GpuProgram>, b: &Arc<dyn GpuProgram>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
