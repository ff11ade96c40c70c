/// VertexArrayBuffer - geometry batch owning its index and attribute buffers.
///
/// Lifecycle:
/// - Producer thread: `upload_data` / `upload_indexes`, then `preflush`
/// - Handoff: the whole object is moved to the render thread
/// - Render thread: `build` once per program, then `render` / `render_range`
///   and `apply_mutation` as often as needed
///
/// On devices that cannot share GPU resources between contexts the quirk
/// flag `deferred_upload` turns `preflush` into a no-op and materializes
/// everything inside `build`, on the thread that renders.

use std::sync::Arc;

use crate::backend::{create_backend, IndicesRange, VertexArrayBackend};
use crate::buffer::{BufferMap, DataBuffer, IndexBuffer};
use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_trace};
use crate::graphics_device::{BufferUsage, DeviceCaps, GpuProgram, GraphicsContext, IndexType};
use crate::mutation::{covering_range, AttributeBufferMutator, IndexBufferMutator};
use crate::vertex_layout::VertexLayoutKey;

// ===== DESCRIPTOR =====

/// Construction parameters of a VertexArrayBuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexArrayBufferDesc {
    /// Index buffer capacity in indices
    pub index_capacity: u32,
    /// Capacity of attribute buffers created on first use, in vertices
    pub vertex_capacity: u32,
    /// Width of the indices
    pub index_type: IndexType,
    /// Postpone GPU materialization from `preflush` to `build`
    pub deferred_upload: bool,
}

impl Default for VertexArrayBufferDesc {
    fn default() -> Self {
        Self {
            index_capacity: 65535,
            vertex_capacity: 65535,
            index_type: IndexType::U16,
            deferred_upload: false,
        }
    }
}

impl VertexArrayBufferDesc {
    /// Descriptor matching the device quirks and index support of `caps`
    pub fn for_device(caps: DeviceCaps, index_capacity: u32, vertex_capacity: u32) -> Self {
        Self {
            index_capacity,
            vertex_capacity,
            index_type: if caps.contains(DeviceCaps::UINT32_INDICES) {
                IndexType::U32
            } else {
                IndexType::U16
            },
            deferred_upload: caps.contains(DeviceCaps::DEFERRED_UPLOAD),
        }
    }
}

// ===== VERTEX ARRAY BUFFER =====

pub struct VertexArrayBuffer {
    index_buffer: IndexBuffer,
    static_buffers: BufferMap,
    dynamic_buffers: BufferMap,
    vertex_capacity: u32,
    /// Device quirk, fixed at construction
    deferred_upload: bool,
    /// Chosen on the first build
    backend: Option<Box<dyn VertexArrayBackend>>,
    is_preflushed: bool,
    is_changed: bool,
    /// Number of static streams in the last captured vertex state
    captured_static_count: Option<usize>,
}

impl VertexArrayBuffer {
    pub fn new(desc: VertexArrayBufferDesc) -> Self {
        Self {
            index_buffer: IndexBuffer::new(desc.index_type, desc.index_capacity),
            static_buffers: BufferMap::new(),
            dynamic_buffers: BufferMap::new(),
            vertex_capacity: desc.vertex_capacity,
            deferred_upload: desc.deferred_upload,
            backend: None,
            is_preflushed: false,
            is_changed: false,
            captured_static_count: None,
        }
    }

    // ===== PRODUCER SIDE =====

    /// Append `count` vertices to the stream of `layout`
    ///
    /// Static and dynamic layouts go to separate buffer maps. The buffer is
    /// created with the default vertex capacity on first use.
    pub fn upload_data(&mut self, layout: &VertexLayoutKey, data: &[u8], count: u32) -> Result<()> {
        let buffers = if layout.is_dynamic() {
            &mut self.dynamic_buffers
        } else {
            &mut self.static_buffers
        };
        buffers.get_or_create(layout, self.vertex_capacity).upload_data(data, count)?;

        if count > 0 {
            self.is_changed = true;
        }
        Ok(())
    }

    /// Append `count` indices of raw index data
    pub fn upload_indexes(&mut self, data: &[u8], count: u32) -> Result<()> {
        if count > self.index_buffer.available_size() {
            engine_bail!("meridian::VertexArrayBuffer", CapacityExceeded,
                "upload of {} indices, only {} available",
                count, self.index_buffer.available_size());
        }
        self.index_buffer.upload_data(data, count)
    }

    /// Move every buffer to the GPU, unless materialization is deferred to build
    pub fn preflush(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if self.deferred_upload {
            return Ok(());
        }
        self.preflush_impl(ctx)
    }

    fn preflush_impl(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        if self.is_preflushed {
            engine_bail!("meridian::VertexArrayBuffer", InvalidSequence,
                "preflush called twice");
        }

        for (_, buffer) in self.static_buffers.iter_mut() {
            buffer.move_to_gpu(ctx, BufferUsage::Vertex)?;
        }
        for (_, buffer) in self.dynamic_buffers.iter_mut() {
            buffer.move_to_gpu(ctx, BufferUsage::Vertex)?;
        }
        self.index_buffer.move_to_gpu(ctx)?;

        // Leave no buffer bound behind on GL, there is no vertex state active yet
        if ctx.api_version().is_gl() {
            ctx.unbind_buffer(BufferUsage::Index);
            ctx.unbind_buffer(BufferUsage::Vertex);
        }

        self.is_preflushed = true;
        engine_debug!("meridian::VertexArrayBuffer",
            "Moved {} static, {} dynamic buffers and {} indices to GPU",
            self.static_buffers.len(), self.dynamic_buffers.len(), self.index_buffer.current_size());
        Ok(())
    }

    /// Move streams created after preflush to the GPU
    fn materialize_late_buffers(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        let buffers = self.static_buffers.iter_mut().chain(self.dynamic_buffers.iter_mut());
        for (layout, buffer) in buffers {
            if !buffer.is_materialized() {
                engine_debug!("meridian::VertexArrayBuffer",
                    "Moving layout {} created after preflush to GPU", layout.id());
                buffer.move_to_gpu(ctx, BufferUsage::Vertex)?;
            }
        }
        Ok(())
    }

    // ===== RENDER SIDE =====

    /// Prepare the batch for drawing with `program`
    ///
    /// Runs deferred materialization, picks the backend on the first call and
    /// captures the static bindings into the cached vertex state when the
    /// backend asks for it. Static streams added since the last capture are
    /// captured into the existing vertex state.
    pub fn build(&mut self, ctx: &mut dyn GraphicsContext, program: &Arc<dyn GpuProgram>) -> Result<()> {
        if self.deferred_upload && !self.is_preflushed {
            engine_debug!("meridian::VertexArrayBuffer", "Running deferred preflush on build");
            self.preflush_impl(ctx)?;
        } else if self.is_preflushed {
            self.materialize_late_buffers(ctx)?;
        }

        let backend = match &mut self.backend {
            Some(backend) => backend,
            None => self.backend.insert(create_backend(ctx.api_version())?),
        };

        if self.static_buffers.is_empty() {
            return Ok(());
        }

        let rebuilt = backend.build(ctx, program)?;
        if !rebuilt {
            // Static streams added after the last capture are missing from the vertex state
            let stale = self.captured_static_count
                .is_some_and(|captured| captured != self.static_buffers.len());
            if !stale {
                return Ok(());
            }
            engine_debug!("meridian::VertexArrayBuffer",
                "Re-capturing {} static streams into existing vertex state", self.static_buffers.len());
        }

        backend.bind(ctx)?;
        backend.bind_buffers(ctx, &self.static_buffers)?;
        backend.unbind(ctx);
        self.captured_static_count = Some(self.static_buffers.len());
        Ok(())
    }

    /// Draw every uploaded index
    pub fn render(&mut self, ctx: &mut dyn GraphicsContext, draw_as_line: bool) -> Result<()> {
        let range = IndicesRange::new(0, self.index_count());
        self.render_range(ctx, draw_as_line, range)
    }

    /// Draw the indices in `range`
    ///
    /// Static streams come from the cached vertex state when there is one,
    /// dynamic streams are bound on every call.
    pub fn render_range(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        draw_as_line: bool,
        range: IndicesRange,
    ) -> Result<()> {
        if self.static_buffers.is_empty() && self.dynamic_buffers.is_empty() {
            return Ok(());
        }
        if self.index_count() == 0 || range.is_empty() {
            return Ok(());
        }
        match range.start.checked_add(range.count) {
            Some(end) if end <= self.index_count() => {}
            _ => engine_bail!("meridian::VertexArrayBuffer", InvalidResource,
                "draw of {} indices from {} past the {} uploaded",
                range.count, range.start, self.index_count()),
        }

        let Some(backend) = self.backend.as_mut() else {
            engine_bail!("meridian::VertexArrayBuffer", InvalidSequence,
                "render before build");
        };

        if !backend.bind(ctx)? {
            backend.bind_buffers(ctx, &self.static_buffers)?;
        }
        backend.bind_buffers(ctx, &self.dynamic_buffers)?;
        self.index_buffer.bind()?;

        backend.render_range(ctx, draw_as_line, range, self.index_buffer.index_type())?;
        backend.unbind(ctx);
        Ok(())
    }

    /// Patch already uploaded data in place
    ///
    /// The index mutator replaces the whole index content, reallocating the
    /// index buffer when it needs more room. Each layout of the attribute
    /// mutator is written through one mapping of its covering range.
    pub fn apply_mutation(
        &mut self,
        ctx: &mut dyn GraphicsContext,
        index_mutator: Option<&IndexBufferMutator>,
        attribute_mutator: Option<&AttributeBufferMutator>,
    ) -> Result<()> {
        let Some(backend) = self.backend.as_ref() else {
            engine_bail!("meridian::VertexArrayBuffer", InvalidSequence,
                "mutation before build");
        };

        // Raw buffer binds must not land in an unrelated vertex state
        backend.bind(ctx)?;

        if let Some(mutator) = index_mutator {
            if mutator.index_type() != self.index_buffer.index_type() {
                engine_bail!("meridian::VertexArrayBuffer", MalformedMutation,
                    "index mutation of {:?} indices on a {:?} index buffer",
                    mutator.index_type(), self.index_buffer.index_type());
            }
            if mutator.capacity() > self.index_buffer.capacity() {
                engine_debug!("meridian::VertexArrayBuffer",
                    "Reallocating index buffer: {} -> {} indices",
                    self.index_buffer.capacity(), mutator.capacity());
                let mut index_buffer = IndexBuffer::new(self.index_buffer.index_type(), mutator.capacity());
                index_buffer.move_to_gpu(ctx)?;
                self.index_buffer = index_buffer;
            }
            self.index_buffer.update_data(mutator.indices(), mutator.index_count())?;
        }

        if let Some(mutator) = attribute_mutator {
            for (layout, nodes) in mutator.mutate_data() {
                if nodes.is_empty() {
                    continue;
                }
                let range = covering_range(nodes)?;

                let Some(buffer) = self.dynamic_buffers.get_mut(layout) else {
                    engine_bail!("meridian::VertexArrayBuffer", InvalidResource,
                        "no dynamic buffer for layout {}", layout.id());
                };
                let mut mapper = buffer.map(range.offset, range.count)?;
                for node in nodes {
                    engine_trace!("meridian::VertexArrayBuffer",
                        "Mutating layout {}: {} bytes at {}",
                        layout.id(), node.region().count, node.region().offset);
                    mapper.update_data(node.region().offset - range.offset, node.data())?;
                }
            }
        }

        backend.unbind(ctx);
        Ok(())
    }

    // ===== ACCESSORS =====

    /// Vertices left in the static streams
    ///
    /// The default capacity while no static stream exists.
    pub fn available_vertex_count(&self) -> u32 {
        let mut sizes = self.static_buffers.values().map(DataBuffer::available_size);
        let Some(first) = sizes.next() else {
            return self.vertex_capacity;
        };
        debug_assert!(sizes.all(|size| size == first),
            "static streams out of lockstep");
        first
    }

    /// Vertex write cursor shared by all static streams
    pub fn start_index_value(&self) -> u32 {
        let mut sizes = self.static_buffers.values().map(DataBuffer::current_size);
        let Some(first) = sizes.next() else {
            return 0;
        };
        debug_assert!(sizes.all(|size| size == first),
            "static streams out of lockstep");
        first
    }

    /// Write cursor of the dynamic stream of `layout`, created on first use
    pub fn dynamic_buffer_offset(&mut self, layout: &VertexLayoutKey) -> u32 {
        self.dynamic_buffers.get_or_create(layout, self.vertex_capacity).current_size()
    }

    pub fn index_count(&self) -> u32 {
        self.index_buffer.current_size()
    }

    pub fn available_index_count(&self) -> u32 {
        self.index_buffer.available_size()
    }

    pub fn index_capacity(&self) -> u32 {
        self.index_buffer.capacity()
    }

    pub fn index_type(&self) -> IndexType {
        self.index_buffer.index_type()
    }

    pub fn static_buffer(&self, layout: &VertexLayoutKey) -> Option<&DataBuffer> {
        self.static_buffers.get(layout)
    }

    pub fn dynamic_buffer(&self, layout: &VertexLayoutKey) -> Option<&DataBuffer> {
        self.dynamic_buffers.get(layout)
    }

    pub fn static_buffer_count(&self) -> usize {
        self.static_buffers.len()
    }

    pub fn dynamic_buffer_count(&self) -> usize {
        self.dynamic_buffers.len()
    }

    /// Whether vertex data was written since the last reset
    pub fn is_changed(&self) -> bool {
        self.is_changed
    }

    pub fn reset_changing_tracking(&mut self) {
        self.is_changed = false;
    }

    pub fn is_preflushed(&self) -> bool {
        self.is_preflushed
    }

    /// Whether GPU materialization waits for `build`
    pub fn is_upload_deferred(&self) -> bool {
        self.deferred_upload
    }
}

#[cfg(test)]
#[path = "vertex_array_buffer_tests.rs"]
mod tests;
