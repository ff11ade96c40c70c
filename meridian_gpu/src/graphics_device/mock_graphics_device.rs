/// Mock graphics context for unit tests (no GPU required)
///
/// Records every call as a string into a shared command log, keeps buffer
/// contents in memory so mapped writes can be read back, and lets tests flip
/// the API version and device capabilities.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{
    ApiVersion, BoundAttribute, BufferDesc, BufferUsage, DeviceCaps, GpuBuffer, GpuProgram,
    GraphicsContext, IndexType, PrimitiveTopology, VertexState,
};
use crate::vertex_layout::AttributeDecl;

new_key_type! {
    /// Key of a buffer record in the mock store
    pub struct MockBufferKey;
}

// ============================================================================
// Shared store
// ============================================================================

/// Contents of one mock GPU buffer
#[derive(Debug, Clone)]
pub struct MockBufferRecord {
    pub name: String,
    pub usage: BufferUsage,
    pub data: Vec<u8>,
    pub mapped: Option<(u64, u64)>,
}

/// State shared between the mock context and the objects it creates
#[derive(Debug, Default)]
pub struct MockStore {
    pub commands: Vec<String>,
    pub buffers: SlotMap<MockBufferKey, MockBufferRecord>,
    pub buffer_allocations: u32,
    pub vertex_state_allocations: u32,
    pub live_vertex_states: u32,
}

impl MockStore {
    fn record(&mut self, command: String) {
        self.commands.push(command);
    }
}

type SharedStore = Arc<Mutex<MockStore>>;

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    key: MockBufferKey,
    name: String,
    usage: BufferUsage,
    size: u64,
    store: SharedStore,
}

impl MockBuffer {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl GpuBuffer for MockBuffer {
    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn upload(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let end = offset + data.len() as u64;
        if end > self.size {
            engine_bail!("meridian::mock", BackendError,
                "upload {}..{} outside {} ({} bytes)", offset, end, self.name, self.size);
        }
        let record = &mut store.buffers[self.key];
        record.data[offset as usize..end as usize].copy_from_slice(data);
        store.record(format!("upload {} offset={} len={}", self.name, offset, data.len()));
        Ok(())
    }

    fn map(&mut self, offset: u64, size: u64) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        if offset + size > self.size {
            engine_bail!("meridian::mock", BackendError,
                "map {}..{} outside {} ({} bytes)", offset, offset + size, self.name, self.size);
        }
        let record = &mut store.buffers[self.key];
        if record.mapped.is_some() {
            engine_bail!("meridian::mock", BackendError, "{} is already mapped", self.name);
        }
        record.mapped = Some((offset, size));
        store.record(format!("map {} offset={} size={}", self.name, offset, size));
        Ok(())
    }

    fn write_mapped(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let record = &mut store.buffers[self.key];
        let Some((base, size)) = record.mapped else {
            engine_bail!("meridian::mock", BackendError, "{} is not mapped", self.name);
        };
        if offset + data.len() as u64 > size {
            engine_bail!("meridian::mock", BackendError,
                "mapped write {}..{} outside mapped size {}", offset, offset + data.len() as u64, size);
        }
        let start = (base + offset) as usize;
        record.data[start..start + data.len()].copy_from_slice(data);
        store.record(format!("write_mapped {} offset={} len={}", self.name, offset, data.len()));
        Ok(())
    }

    fn unmap(&mut self) {
        let mut store = self.store.lock().unwrap();
        store.buffers[self.key].mapped = None;
        store.record(format!("unmap {}", self.name));
    }

    fn bind(&self) {
        self.store.lock().unwrap().record(format!("bind_buffer {}", self.name));
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        if let Ok(mut store) = self.store.lock() {
            store.buffers.remove(self.key);
            store.record(format!("release_buffer {}", self.name));
        }
    }
}

// ============================================================================
// Mock VertexState
// ============================================================================

#[derive(Debug)]
pub struct MockVertexState {
    name: String,
    store: SharedStore,
}

impl VertexState for MockVertexState {
    fn bind(&self) {
        self.store.lock().unwrap().record(format!("bind_vertex_state {}", self.name));
    }
}

impl Drop for MockVertexState {
    fn drop(&mut self) {
        if let Ok(mut store) = self.store.lock() {
            store.live_vertex_states -= 1;
            store.record(format!("delete_vertex_state {}", self.name));
        }
    }
}

// ============================================================================
// Mock Program
// ============================================================================

/// Program with a fixed attribute table
#[derive(Debug)]
pub struct MockProgram {
    pub locations: FxHashMap<String, u32>,
}

impl MockProgram {
    pub fn new(attributes: &[(&str, u32)]) -> Self {
        Self {
            locations: attributes.iter()
                .map(|(name, location)| (name.to_string(), *location))
                .collect(),
        }
    }
}

impl GpuProgram for MockProgram {
    fn attribute_location(&self, name: &str) -> Option<u32> {
        self.locations.get(name).copied()
    }
}

// ============================================================================
// Mock GraphicsContext
// ============================================================================

/// Mock context tracking allocations and bindings without a GPU
#[derive(Debug)]
pub struct MockGraphicsContext {
    pub api_version: ApiVersion,
    pub caps: DeviceCaps,
    store: SharedStore,
}

impl MockGraphicsContext {
    /// Create a mock context
    pub fn new(api_version: ApiVersion, caps: DeviceCaps) -> Self {
        Self {
            api_version,
            caps,
            store: Arc::new(Mutex::new(MockStore::default())),
        }
    }

    /// GL context with vertex array objects
    pub fn gl_cached() -> Self {
        Self::new(ApiVersion::CachedStateGl, DeviceCaps::CACHED_VERTEX_STATE)
    }

    /// GL context without vertex array objects
    pub fn gl_immediate() -> Self {
        Self::new(ApiVersion::ImmediateGl, DeviceCaps::empty())
    }

    /// Explicit-API context
    pub fn explicit() -> Self {
        Self::new(ApiVersion::Explicit, DeviceCaps::UINT32_INDICES)
    }

    /// Recorded commands since creation or the last clear
    pub fn commands(&self) -> Vec<String> {
        self.store.lock().unwrap().commands.clone()
    }

    /// Recorded commands starting with `prefix`
    pub fn commands_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.store.lock().unwrap().commands.iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Forget recorded commands
    pub fn clear_commands(&self) {
        self.store.lock().unwrap().commands.clear();
    }

    /// Number of buffers ever allocated
    pub fn buffer_allocations(&self) -> u32 {
        self.store.lock().unwrap().buffer_allocations
    }

    /// Number of buffers currently alive
    pub fn live_buffers(&self) -> usize {
        self.store.lock().unwrap().buffers.len()
    }

    /// Number of vertex states ever created
    pub fn vertex_state_allocations(&self) -> u32 {
        self.store.lock().unwrap().vertex_state_allocations
    }

    /// Number of vertex states currently alive
    pub fn live_vertex_states(&self) -> u32 {
        self.store.lock().unwrap().live_vertex_states
    }

    /// Contents of a live buffer by name
    pub fn buffer_contents(&self, name: &str) -> Option<Vec<u8>> {
        self.store.lock().unwrap().buffers.values()
            .find(|record| record.name == name)
            .map(|record| record.data.clone())
    }

    /// Names of live buffers with the given usage, in allocation order
    pub fn live_buffer_names(&self, usage: BufferUsage) -> Vec<String> {
        let store = self.store.lock().unwrap();
        let mut names: Vec<String> = store.buffers.values()
            .filter(|record| record.usage == usage)
            .map(|record| record.name.clone())
            .collect();
        names.sort_by_key(|name| {
            name.rsplit('#').next().and_then(|n| n.parse::<u32>().ok()).unwrap_or(0)
        });
        names
    }
}

impl GraphicsContext for MockGraphicsContext {
    fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    fn capabilities(&self) -> DeviceCaps {
        self.caps
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Box<dyn GpuBuffer>> {
        let mut store = self.store.lock().unwrap();
        let prefix = match desc.usage {
            BufferUsage::Vertex => "vertex",
            BufferUsage::Index => "index",
        };
        let name = format!("{}#{}", prefix, store.buffer_allocations);
        store.buffer_allocations += 1;

        let size = desc.size_bytes();
        let key = store.buffers.insert(MockBufferRecord {
            name: name.clone(),
            usage: desc.usage,
            data: vec![0; size as usize],
            mapped: None,
        });
        store.record(format!("create_buffer {} size={}", name, size));

        Ok(Box::new(MockBuffer {
            key,
            name,
            usage: desc.usage,
            size,
            store: self.store.clone(),
        }))
    }

    fn unbind_buffer(&mut self, usage: BufferUsage) {
        self.store.lock().unwrap().record(format!("unbind_buffer {:?}", usage));
    }

    fn create_vertex_state(&mut self) -> Result<Box<dyn VertexState>> {
        let mut store = self.store.lock().unwrap();
        let name = format!("vao#{}", store.vertex_state_allocations);
        store.vertex_state_allocations += 1;
        store.live_vertex_states += 1;
        store.record(format!("create_vertex_state {}", name));

        Ok(Box::new(MockVertexState {
            name,
            store: self.store.clone(),
        }))
    }

    fn unbind_vertex_state(&mut self) {
        self.store.lock().unwrap().record("unbind_vertex_state".to_string());
    }

    fn enable_vertex_attribute(&mut self, location: u32) {
        self.store.lock().unwrap().record(format!("enable_attribute {}", location));
    }

    fn vertex_attribute_pointer(&mut self, location: u32, decl: &AttributeDecl) {
        self.store.lock().unwrap().record(format!(
            "attribute_pointer {} components={} type={:?} stride={} offset={}",
            location, decl.component_count, decl.component_type, decl.stride, decl.offset
        ));
    }

    fn set_vertex_buffer(
        &mut self,
        slot: u32,
        buffer: &dyn GpuBuffer,
        attributes: &[BoundAttribute],
    ) -> Result<()> {
        let locations: Vec<String> = attributes.iter().map(|a| a.location.to_string()).collect();
        // Buffer names are not reachable through the trait, identify by size
        self.store.lock().unwrap().record(format!(
            "set_vertex_buffer slot={} size={} locations=[{}]",
            slot, buffer.size(), locations.join(",")
        ));
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_type: IndexType,
        first_index: u32,
        index_count: u32,
    ) -> Result<()> {
        self.store.lock().unwrap().record(format!(
            "draw_indexed {:?} {:?} first={} count={}",
            topology, index_type, first_index, index_count
        ));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
