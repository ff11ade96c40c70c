/// GL binding strategy.
///
/// With vertex array objects available the static bindings are captured once
/// per program into a VAO. Without them every draw binds its buffers and
/// attribute pointers by hand. Availability is read from the context on every
/// call, so the same backend serves both cases.

use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::backend::{IndicesRange, VertexArrayBackend};
use crate::backend::vertex_array_backend::same_program;
use crate::buffer::BufferMap;
use crate::error::Result;
use crate::{engine_bail, engine_debug};
use crate::graphics_device::{
    DeviceCaps, GpuProgram, GraphicsContext, IndexType, PrimitiveTopology, VertexState,
};

#[derive(Default)]
pub struct GlVertexArrayBackend {
    program: Option<Arc<dyn GpuProgram>>,
    vertex_state: Option<Box<dyn VertexState>>,
    /// Attribute locations resolved against `program`
    locations: FxHashMap<String, u32>,
}

impl GlVertexArrayBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a vertex array object currently exists
    pub fn has_vertex_state(&self) -> bool {
        self.vertex_state.is_some()
    }

    fn attribute_location(&mut self, name: &str) -> Result<u32> {
        if let Some(&location) = self.locations.get(name) {
            return Ok(location);
        }
        let Some(program) = &self.program else {
            engine_bail!("meridian::GlVertexArrayBackend", InvalidSequence,
                "buffers bound before build");
        };
        let Some(location) = program.attribute_location(name) else {
            engine_bail!("meridian::GlVertexArrayBackend", InvalidResource,
                "program has no attribute '{}'", name);
        };
        self.locations.insert(name.to_string(), location);
        Ok(location)
    }
}

fn supports_vertex_state(ctx: &dyn GraphicsContext) -> bool {
    ctx.capabilities().contains(DeviceCaps::CACHED_VERTEX_STATE)
}

impl VertexArrayBackend for GlVertexArrayBackend {
    fn build(&mut self, ctx: &mut dyn GraphicsContext, program: &Arc<dyn GpuProgram>) -> Result<bool> {
        let same = self.program.as_ref().is_some_and(|current| same_program(current, program));
        if same && self.vertex_state.is_some() {
            return Ok(false);
        }

        if !same {
            self.locations.clear();
        }
        self.program = Some(program.clone());

        if !supports_vertex_state(ctx) {
            return Ok(false);
        }

        // Release the previous VAO before creating its replacement
        self.vertex_state = None;
        self.vertex_state = Some(ctx.create_vertex_state()?);
        engine_debug!("meridian::GlVertexArrayBackend", "Created vertex array object");
        Ok(true)
    }

    fn bind(&self, ctx: &mut dyn GraphicsContext) -> Result<bool> {
        if !supports_vertex_state(ctx) {
            return Ok(false);
        }
        match &self.vertex_state {
            Some(vertex_state) => {
                vertex_state.bind();
                Ok(true)
            }
            // Built while the device reported no support
            None if self.program.is_some() => Ok(false),
            None => engine_bail!("meridian::GlVertexArrayBackend", InvalidSequence,
                "vertex array object bound before build"),
        }
    }

    fn unbind(&self, ctx: &mut dyn GraphicsContext) {
        if supports_vertex_state(ctx) && self.vertex_state.is_some() {
            ctx.unbind_vertex_state();
        }
    }

    fn bind_buffers(&mut self, ctx: &mut dyn GraphicsContext, buffers: &BufferMap) -> Result<()> {
        for (layout, buffer) in buffers.iter() {
            buffer.bind()?;
            for decl in layout.attributes() {
                let location = self.attribute_location(&decl.name)?;
                ctx.enable_vertex_attribute(location);
                ctx.vertex_attribute_pointer(location, decl);
            }
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
        if self.program.is_none() {
            engine_bail!("meridian::GlVertexArrayBackend", InvalidSequence,
                "render before build");
        }
        ctx.draw_indexed(
            PrimitiveTopology::from_draw_as_line(draw_as_line),
            index_type,
            range.start,
            range.count,
        )
    }
}

#[cfg(test)]
#[path = "gl_backend_tests.rs"]
mod tests;
