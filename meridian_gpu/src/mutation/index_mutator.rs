/// Full index-buffer replacement collected during a mutation pass.

use crate::buffer::IndexStorage;
use crate::graphics_device::IndexType;

#[derive(Debug, Clone)]
pub struct IndexBufferMutator {
    capacity: u32,
    indices: IndexStorage,
}

impl IndexBufferMutator {
    /// Empty mutator able to hold `base_capacity` indices before growing
    pub fn new(base_capacity: u32, index_type: IndexType) -> Self {
        Self {
            capacity: base_capacity,
            indices: IndexStorage::with_capacity(index_type, base_capacity as usize),
        }
    }

    /// Append indices, growing the capacity to at least double when full
    pub fn append_indices(&mut self, indices: &[u32]) {
        let required = self.indices.count() + indices.len() as u32;
        if required > self.capacity {
            self.capacity = required.max(self.capacity.saturating_mul(2));
            self.indices.reserve(self.capacity as usize - self.indices.len());
        }
        self.indices.extend_from_slice(indices);
    }

    /// Capacity the target index buffer must offer
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn index_count(&self) -> u32 {
        self.indices.count()
    }

    pub fn index_type(&self) -> IndexType {
        self.indices.index_type()
    }

    /// Raw index bytes
    pub fn indices(&self) -> &[u8] {
        self.indices.as_bytes()
    }
}

#[cfg(test)]
#[path = "index_mutator_tests.rs"]
mod tests;
