/// Attribute buffers keyed by vertex layout.
///
/// Keys compare by content, so structurally equal layouts always land on
/// the same buffer. Iteration follows key order, which makes binding order
/// deterministic across frames.

use std::collections::BTreeMap;
use crate::buffer::DataBuffer;
use crate::engine_trace;
use crate::vertex_layout::VertexLayoutKey;

#[derive(Default)]
pub struct BufferMap {
    buffers: BTreeMap<VertexLayoutKey, DataBuffer>,
}

impl BufferMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer for `key`, created with `default_capacity` elements on first use
    pub fn get_or_create(&mut self, key: &VertexLayoutKey, default_capacity: u32) -> &mut DataBuffer {
        self.buffers.entry(key.clone()).or_insert_with(|| {
            engine_trace!("meridian::BufferMap",
                "New {} buffer for layout {} ({} bytes per element, {} elements)",
                if key.is_dynamic() { "dynamic" } else { "static" },
                key.id(), key.element_size(), default_capacity);
            DataBuffer::new(key.element_size(), default_capacity)
        })
    }

    pub fn get(&self, key: &VertexLayoutKey) -> Option<&DataBuffer> {
        self.buffers.get(key)
    }

    pub fn get_mut(&mut self, key: &VertexLayoutKey) -> Option<&mut DataBuffer> {
        self.buffers.get_mut(key)
    }

    pub fn contains(&self, key: &VertexLayoutKey) -> bool {
        self.buffers.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VertexLayoutKey, &DataBuffer)> {
        self.buffers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&VertexLayoutKey, &mut DataBuffer)> {
        self.buffers.iter_mut()
    }

    pub fn values(&self) -> impl Iterator<Item = &DataBuffer> {
        self.buffers.values()
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

#[cfg(test)]
#[path = "buffer_map_tests.rs"]
mod tests;
