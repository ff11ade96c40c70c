/// Explicit-API binding strategy (Metal/Vulkan class)
///
/// No cached vertex state exists here: every draw hands each stream to the
/// context with its vertex-buffer slot and resolved attribute locations.

use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::backend::{IndicesRange, VertexArrayBackend};
use crate::backend::vertex_array_backend::same_program;
use crate::buffer::BufferMap;
use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    BoundAttribute, GpuProgram, GraphicsContext, IndexType, PrimitiveTopology,
};
use crate::vertex_layout::VertexLayoutKey;

#[derive(Default)]
pub struct ExplicitVertexArrayBackend {
    program: Option<Arc<dyn GpuProgram>>,
    /// Vertex-buffer slot per layout, assigned on first bind
    slots: FxHashMap<VertexLayoutKey, u32>,
}

impl ExplicitVertexArrayBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot assigned to `layout`, if it was ever bound
    pub fn slot(&self, layout: &VertexLayoutKey) -> Option<u32> {
        self.slots.get(layout).copied()
    }

    fn require_program(&self) -> Result<&Arc<dyn GpuProgram>> {
        match &self.program {
            Some(program) => Ok(program),
            None => engine_bail!("meridian::ExplicitVertexArrayBackend", InvalidSequence,
                "backend used before build"),
        }
    }
}

impl VertexArrayBackend for ExplicitVertexArrayBackend {
    fn build(&mut self, _ctx: &mut dyn GraphicsContext, program: &Arc<dyn GpuProgram>) -> Result<bool> {
        let same = self.program.as_ref().is_some_and(|current| same_program(current, program));
        if !same {
            self.program = Some(program.clone());
        }
        Ok(false)
    }

    fn bind(&self, _ctx: &mut dyn GraphicsContext) -> Result<bool> {
        self.require_program()?;
        Ok(false)
    }

    fn unbind(&self, _ctx: &mut dyn GraphicsContext) {}

    fn bind_buffers(&mut self, ctx: &mut dyn GraphicsContext, buffers: &BufferMap) -> Result<()> {
        let program = self.require_program()?.clone();

        for (layout, buffer) in buffers.iter() {
            let Some(gpu_buffer) = buffer.gpu_buffer() else {
                engine_bail!("meridian::ExplicitVertexArrayBackend", InvalidSequence,
                    "layout {} bound before the buffer is moved to GPU", layout.id());
            };

            let mut attributes = Vec::with_capacity(layout.attribute_count());
            for decl in layout.attributes() {
                let Some(location) = program.attribute_location(&decl.name) else {
                    engine_bail!("meridian::ExplicitVertexArrayBackend", InvalidResource,
                        "program has no attribute '{}'", decl.name);
                };
                attributes.push(BoundAttribute { location, decl: decl.clone() });
            }

            let next_slot = self.slots.len() as u32;
            let slot = *self.slots.entry(layout.clone()).or_insert(next_slot);
            ctx.set_vertex_buffer(slot, gpu_buffer, &attributes)?;
        }
        Ok(())
    }

    fn render_range(
        &self,
        ctx: &mut dyn GraphicsContext,
        draw_as_line: bool,
        range: IndicesRange,
        index_type: IndexType,
    ) -> Result<()> {
        self.require_program()?;
        ctx.draw_indexed(
            PrimitiveTopology::from_draw_as_line(draw_as_line),
            index_type,
            range.start,
            range.count,
        )
    }
}

#[cfg(test)]
#[path = "explicit_backend_tests.rs"]
mod tests;
