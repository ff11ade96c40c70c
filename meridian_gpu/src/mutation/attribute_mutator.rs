/// Partial writes into dynamic attribute buffers.
///
/// A mutation pass collects byte regions per layout. The orchestrator maps
/// the covering range of each layout once and applies every region inside
/// that single mapping.

use std::collections::BTreeMap;
use crate::error::Result;
use crate::engine_bail;
use crate::vertex_layout::VertexLayoutKey;

// ===== MUTATE REGION =====

/// Byte range inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutateRegion {
    /// Byte offset from the buffer start
    pub offset: u64,
    /// Byte count
    pub count: u64,
}

impl MutateRegion {
    pub fn new(offset: u64, count: u64) -> Self {
        Self { offset, count }
    }

    /// One past the last byte, `None` when it does not fit in `u64`
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.count)
    }
}

// ===== MUTATE NODE =====

/// One partial write: a region and the bytes to put there
///
/// The region's byte count always equals the data length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutateNode {
    region: MutateRegion,
    data: Vec<u8>,
}

impl MutateNode {
    /// Node writing `data` at `offset`, the byte count follows the data
    pub fn new(offset: u64, data: Vec<u8>) -> Self {
        Self {
            region: MutateRegion::new(offset, data.len() as u64),
            data,
        }
    }

    pub fn region(&self) -> MutateRegion { self.region }

    pub fn data(&self) -> &[u8] { &self.data }
}

/// Smallest byte range containing every region of `nodes`
///
/// Fails on an empty list, on any zero-length region and on a region whose
/// end overflows `u64`.
pub fn covering_range(nodes: &[MutateNode]) -> Result<MutateRegion> {
    if nodes.is_empty() {
        engine_bail!("meridian::mutation", MalformedMutation,
            "covering range of an empty region list");
    }

    let mut min_offset = u64::MAX;
    let mut max_end = 0;
    for node in nodes {
        if node.region.count == 0 {
            engine_bail!("meridian::mutation", MalformedMutation,
                "zero-length region at offset {}", node.region.offset);
        }
        let Some(end) = node.region.end() else {
            engine_bail!("meridian::mutation", MalformedMutation,
                "region of {} bytes at offset {} overflows", node.region.count, node.region.offset);
        };
        min_offset = min_offset.min(node.region.offset);
        max_end = max_end.max(end);
    }

    Ok(MutateRegion::new(min_offset, max_end - min_offset))
}

// ===== ATTRIBUTE BUFFER MUTATOR =====

/// Per-pass collection of partial writes grouped by layout
#[derive(Debug, Default)]
pub struct AttributeBufferMutator {
    data: BTreeMap<VertexLayoutKey, Vec<MutateNode>>,
}

impl AttributeBufferMutator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write for the dynamic stream of `layout`
    pub fn add_mutation(&mut self, layout: &VertexLayoutKey, node: MutateNode) {
        self.data.entry(layout.clone()).or_default().push(node);
    }

    /// Queued writes, in insertion order per layout
    pub fn mutate_data(&self) -> &BTreeMap<VertexLayoutKey, Vec<MutateNode>> {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
#[path = "attribute_mutator_tests.rs"]
mod tests;
