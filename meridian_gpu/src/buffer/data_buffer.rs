/// Growable GPU buffer of fixed-size elements.
///
/// A DataBuffer starts CPU-side: uploads append into a host shadow until
/// `move_to_gpu` allocates the GPU buffer at full capacity and copies the
/// shadow into it. From then on uploads go straight to the GPU buffer.
///
/// Architecture:
/// - element_size: bytes per element, fixed for the buffer lifetime
/// - capacity: number of elements, never grows (callers reallocate)
/// - current_size: number of elements written so far (the write cursor)

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{BufferDesc, BufferUsage, GpuBuffer, GraphicsContext};

// ===== STORAGE =====

enum Storage {
    /// Host shadow, holds exactly `current_size` elements
    Cpu(Vec<u8>),
    /// Materialized GPU buffer of `capacity` elements
    Gpu(Box<dyn GpuBuffer>),
}

// ===== DATA BUFFER =====

pub struct DataBuffer {
    element_size: u32,
    capacity: u32,
    current_size: u32,
    storage: Storage,
}

impl DataBuffer {
    /// Create an empty CPU-side buffer
    pub fn new(element_size: u32, capacity: u32) -> Self {
        Self {
            element_size,
            capacity,
            current_size: 0,
            storage: Storage::Cpu(Vec::with_capacity(element_size as usize * capacity as usize)),
        }
    }

    // ===== ACCESSORS =====

    /// Bytes per element
    pub fn element_size(&self) -> u32 { self.element_size }

    /// Capacity in elements
    pub fn capacity(&self) -> u32 { self.capacity }

    /// Elements written so far
    pub fn current_size(&self) -> u32 { self.current_size }

    /// Elements left before the buffer is full
    pub fn available_size(&self) -> u32 { self.capacity - self.current_size }

    /// Whether the GPU buffer has been allocated
    pub fn is_materialized(&self) -> bool {
        matches!(self.storage, Storage::Gpu(_))
    }

    /// The GPU buffer, once materialized
    pub fn gpu_buffer(&self) -> Option<&dyn GpuBuffer> {
        match &self.storage {
            Storage::Gpu(buffer) => Some(buffer.as_ref()),
            Storage::Cpu(_) => None,
        }
    }

    /// Host copy of the written elements, before materialization
    pub fn cpu_data(&self) -> Option<&[u8]> {
        match &self.storage {
            Storage::Cpu(data) => Some(data),
            Storage::Gpu(_) => None,
        }
    }

    // ===== WRITES =====

    /// Append `count` elements at the write cursor
    ///
    /// `data` must hold exactly `count * element_size` bytes.
    pub fn upload_data(&mut self, data: &[u8], count: u32) -> Result<()> {
        // ========== VALIDATION ==========
        if count > self.available_size() {
            engine_bail!("meridian::DataBuffer", CapacityExceeded,
                "upload of {} elements, only {} of {} left",
                count, self.available_size(), self.capacity);
        }
        let expected = count as usize * self.element_size as usize;
        if data.len() != expected {
            engine_bail!("meridian::DataBuffer", InvalidResource,
                "upload of {} elements expects {} bytes, got {}",
                count, expected, data.len());
        }

        // ========== WRITE ==========
        match &mut self.storage {
            Storage::Cpu(shadow) => shadow.extend_from_slice(data),
            Storage::Gpu(buffer) => {
                let offset = self.current_size as u64 * self.element_size as u64;
                buffer.upload(offset, data)?;
            }
        }
        self.current_size += count;
        Ok(())
    }

    /// Replace the content from the start with `count` elements
    pub fn update_data(&mut self, data: &[u8], count: u32) -> Result<()> {
        self.seek(0)?;
        if count > 0 {
            self.upload_data(data, count)?;
        }
        Ok(())
    }

    /// Move the write cursor to `element`
    pub fn seek(&mut self, element: u32) -> Result<()> {
        if element > self.capacity {
            engine_bail!("meridian::DataBuffer", CapacityExceeded,
                "seek to element {} beyond capacity {}", element, self.capacity);
        }
        if let Storage::Cpu(shadow) = &mut self.storage {
            shadow.resize(element as usize * self.element_size as usize, 0);
        }
        self.current_size = element;
        Ok(())
    }

    // ===== GPU =====

    /// Allocate the GPU buffer and copy the host shadow into it
    ///
    /// Materialization happens once; a second call is a sequencing error.
    pub fn move_to_gpu(&mut self, ctx: &mut dyn GraphicsContext, usage: BufferUsage) -> Result<()> {
        let Storage::Cpu(shadow) = &self.storage else {
            engine_bail!("meridian::DataBuffer", InvalidSequence,
                "buffer already moved to GPU");
        };

        let mut buffer = ctx.create_buffer(BufferDesc {
            usage,
            element_size: self.element_size,
            capacity: self.capacity,
        })?;
        if !shadow.is_empty() {
            buffer.upload(0, shadow)?;
        }

        self.storage = Storage::Gpu(buffer);
        Ok(())
    }

    /// Map a byte range of the GPU buffer for direct writes
    pub fn map(&mut self, offset: u64, size: u64) -> Result<BufferMapper<'_>> {
        let capacity_bytes = self.capacity as u64 * self.element_size as u64;
        let Storage::Gpu(buffer) = &mut self.storage else {
            engine_bail!("meridian::DataBuffer", InvalidSequence,
                "map before the buffer is moved to GPU");
        };
        match offset.checked_add(size) {
            Some(end) if end <= capacity_bytes => {}
            _ => engine_bail!("meridian::DataBuffer", MalformedMutation,
                "mapped range of {} bytes at {} outside buffer of {} bytes",
                size, offset, capacity_bytes),
        }
        BufferMapper::new(buffer, offset, size)
    }

    /// Bind the GPU buffer to its binding point
    pub fn bind(&self) -> Result<()> {
        let Storage::Gpu(buffer) = &self.storage else {
            engine_bail!("meridian::DataBuffer", InvalidSequence,
                "bind before the buffer is moved to GPU");
        };
        buffer.bind();
        Ok(())
    }
}

// ===== BUFFER MAPPER =====

/// Scoped mapping of a GPU buffer range
///
/// Writes take offsets relative to the start of the mapped range. The range
/// is unmapped when the mapper is dropped.
pub struct BufferMapper<'a> {
    buffer: &'a mut Box<dyn GpuBuffer>,
    size: u64,
}

impl<'a> BufferMapper<'a> {
    fn new(buffer: &'a mut Box<dyn GpuBuffer>, offset: u64, size: u64) -> Result<Self> {
        buffer.map(offset, size)?;
        Ok(Self { buffer, size })
    }

    /// Size of the mapped range in bytes
    pub fn size(&self) -> u64 { self.size }

    /// Write `data` at `offset` bytes from the range start
    pub fn update_data(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        match offset.checked_add(data.len() as u64) {
            Some(end) if end <= self.size => {}
            _ => engine_bail!("meridian::BufferMapper", MalformedMutation,
                "write of {} bytes at {} outside mapped range of {} bytes",
                data.len(), offset, self.size),
        }
        self.buffer.write_mapped(offset, data)
    }
}

impl Drop for BufferMapper<'_> {
    fn drop(&mut self) {
        self.buffer.unmap();
    }
}

#[cfg(test)]
#[path = "data_buffer_tests.rs"]
mod tests;
