/// Index buffer: a DataBuffer of fixed-width indices, plus the CPU-side
/// index array used to assemble index data before upload.

use crate::error::Result;
use crate::graphics_device::{BufferUsage, GpuBuffer, GraphicsContext, IndexType};
use crate::buffer::DataBuffer;

// ===== INDEX STORAGE =====

/// Growable CPU array of indices in a given width
///
/// Values are always passed as `u32` and narrowed when the width is `U16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexStorage {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexStorage {
    pub fn new(index_type: IndexType) -> Self {
        Self::with_capacity(index_type, 0)
    }

    pub fn with_capacity(index_type: IndexType, capacity: usize) -> Self {
        match index_type {
            IndexType::U16 => IndexStorage::U16(Vec::with_capacity(capacity)),
            IndexType::U32 => IndexStorage::U32(Vec::with_capacity(capacity)),
        }
    }

    pub fn from_indices(index_type: IndexType, indices: &[u32]) -> Self {
        let mut storage = Self::with_capacity(index_type, indices.len());
        storage.extend_from_slice(indices);
        storage
    }

    pub fn index_type(&self) -> IndexType {
        match self {
            IndexStorage::U16(_) => IndexType::U16,
            IndexStorage::U32(_) => IndexType::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            IndexStorage::U16(v) => v.len(),
            IndexStorage::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of indices as an element count
    pub fn count(&self) -> u32 {
        self.len() as u32
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        match self {
            IndexStorage::U16(v) => v.get(index).map(|&i| i as u32),
            IndexStorage::U32(v) => v.get(index).copied(),
        }
    }

    pub fn push(&mut self, index: u32) {
        match self {
            IndexStorage::U16(v) => {
                debug_assert!(index <= u16::MAX as u32, "index {} does not fit in 16 bits", index);
                v.push(index as u16);
            }
            IndexStorage::U32(v) => v.push(index),
        }
    }

    pub fn extend_from_slice(&mut self, indices: &[u32]) {
        match self {
            IndexStorage::U16(v) => {
                v.extend(indices.iter().map(|&i| {
                    debug_assert!(i <= u16::MAX as u32, "index {} does not fit in 16 bits", i);
                    i as u16
                }));
            }
            IndexStorage::U32(v) => v.extend_from_slice(indices),
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        match self {
            IndexStorage::U16(v) => v.reserve(additional),
            IndexStorage::U32(v) => v.reserve(additional),
        }
    }

    pub fn clear(&mut self) {
        match self {
            IndexStorage::U16(v) => v.clear(),
            IndexStorage::U32(v) => v.clear(),
        }
    }

    /// Raw bytes in native endianness, ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            IndexStorage::U16(v) => bytemuck::cast_slice(v),
            IndexStorage::U32(v) => bytemuck::cast_slice(v),
        }
    }
}

// ===== INDEX BUFFER =====

/// GPU index buffer with a write cursor
pub struct IndexBuffer {
    index_type: IndexType,
    buffer: DataBuffer,
}

impl IndexBuffer {
    pub fn new(index_type: IndexType, capacity: u32) -> Self {
        Self {
            index_type,
            buffer: DataBuffer::new(index_type.size_bytes(), capacity),
        }
    }

    pub fn index_type(&self) -> IndexType { self.index_type }

    pub fn capacity(&self) -> u32 { self.buffer.capacity() }

    /// Indices written so far
    pub fn current_size(&self) -> u32 { self.buffer.current_size() }

    /// Indices left before the buffer is full
    pub fn available_size(&self) -> u32 { self.buffer.available_size() }

    pub fn is_materialized(&self) -> bool { self.buffer.is_materialized() }

    pub fn gpu_buffer(&self) -> Option<&dyn GpuBuffer> { self.buffer.gpu_buffer() }

    /// Append `count` indices of raw index data
    pub fn upload_data(&mut self, data: &[u8], count: u32) -> Result<()> {
        self.buffer.upload_data(data, count)
    }

    /// Replace the whole content with `count` indices
    pub fn update_data(&mut self, data: &[u8], count: u32) -> Result<()> {
        self.buffer.update_data(data, count)
    }

    pub fn move_to_gpu(&mut self, ctx: &mut dyn GraphicsContext) -> Result<()> {
        self.buffer.move_to_gpu(ctx, BufferUsage::Index)
    }

    pub fn bind(&self) -> Result<()> {
        self.buffer.bind()
    }
}

#[cfg(test)]
#[path = "index_buffer_tests.rs"]
mod tests;
