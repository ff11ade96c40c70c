use super::*;

// ============================================================================
// Size tests
// ============================================================================

#[test]
fn test_index_type_size_bytes() {
    assert_eq!(IndexType::U16.size_bytes(), 2);
    assert_eq!(IndexType::U32.size_bytes(), 4);
}

#[test]
fn test_component_type_size_bytes() {
    assert_eq!(ComponentType::Byte.size_bytes(), 1);
    assert_eq!(ComponentType::UnsignedByte.size_bytes(), 1);
    assert_eq!(ComponentType::Short.size_bytes(), 2);
    assert_eq!(ComponentType::UnsignedShort.size_bytes(), 2);
    assert_eq!(ComponentType::Int.size_bytes(), 4);
    assert_eq!(ComponentType::UnsignedInt.size_bytes(), 4);
    assert_eq!(ComponentType::Float.size_bytes(), 4);
}

#[test]
fn test_buffer_desc_size_bytes() {
    let desc = BufferDesc {
        usage: BufferUsage::Vertex,
        element_size: 12,
        capacity: 100,
    };
    assert_eq!(desc.size_bytes(), 1200);
}

#[test]
fn test_buffer_desc_size_does_not_overflow_u32() {
    let desc = BufferDesc {
        usage: BufferUsage::Index,
        element_size: 4,
        capacity: u32::MAX,
    };
    assert_eq!(desc.size_bytes(), 4 * u32::MAX as u64);
}
