/// GpuBuffer trait and buffer descriptor

use crate::error::Result;

/// Buffer usage (binding role)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Vertex attribute data
    Vertex,
    /// Index data
    Index,
}

/// Width of index elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    U16,
    U32,
}

impl IndexType {
    /// Returns size in bytes of one index
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
}

impl ComponentType {
    /// Returns size in bytes of one component
    pub fn size_bytes(&self) -> u32 {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::Int | ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDesc {
    /// Binding role
    pub usage: BufferUsage,
    /// Size of one element in bytes
    pub element_size: u32,
    /// Number of elements
    pub capacity: u32,
}

impl BufferDesc {
    /// Total size in bytes
    pub fn size_bytes(&self) -> u64 {
        self.element_size as u64 * self.capacity as u64
    }
}

/// Buffer resource trait
///
/// Implemented by platform buffer types. The buffer is released when dropped.
pub trait GpuBuffer: Send + Sync {
    /// Binding role the buffer was allocated with
    fn usage(&self) -> BufferUsage;

    /// Total size in bytes
    fn size(&self) -> u64;

    /// Write data at an absolute byte offset
    fn upload(&mut self, offset: u64, data: &[u8]) -> Result<()>;

    /// Map a byte range for direct writes
    fn map(&mut self, offset: u64, size: u64) -> Result<()>;

    /// Write into the mapped range, `offset` is relative to the range start
    fn write_mapped(&mut self, offset: u64, data: &[u8]) -> Result<()>;

    /// Unmap the current range
    fn unmap(&mut self);

    /// Bind the buffer to the binding point of its usage
    fn bind(&self);
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
