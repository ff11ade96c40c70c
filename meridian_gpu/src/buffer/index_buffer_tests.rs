use super::*;
use crate::error::Error;
use crate::graphics_device::mock_graphics_device::MockGraphicsContext;

// ============================================================================
// IndexStorage tests
// ============================================================================

#[test]
fn test_storage_narrows_to_u16() {
    let storage = IndexStorage::from_indices(IndexType::U16, &[0, 1, 2, 65535]);

    assert_eq!(storage.index_type(), IndexType::U16);
    assert_eq!(storage.len(), 4);
    assert_eq!(storage.get(3), Some(65535));
    assert_eq!(storage.as_bytes().len(), 8);
    assert_eq!(&storage.as_bytes()[2..4], &1u16.to_ne_bytes());
}

#[test]
fn test_storage_u32_bytes() {
    let mut storage = IndexStorage::new(IndexType::U32);
    storage.push(70000);
    storage.extend_from_slice(&[1, 2]);

    assert_eq!(storage.count(), 3);
    assert_eq!(storage.as_bytes().len(), 12);
    assert_eq!(&storage.as_bytes()[0..4], &70000u32.to_ne_bytes());
    assert_eq!(storage.get(5), None);
}

#[test]
fn test_storage_clear() {
    let mut storage = IndexStorage::from_indices(IndexType::U16, &[1, 2, 3]);
    storage.clear();

    assert!(storage.is_empty());
    assert!(storage.as_bytes().is_empty());
}

// ============================================================================
// IndexBuffer tests
// ============================================================================

#[test]
fn test_index_buffer_counts() {
    let mut buffer = IndexBuffer::new(IndexType::U16, 6);
    let indices = IndexStorage::from_indices(IndexType::U16, &[0, 1, 2]);

    buffer.upload_data(indices.as_bytes(), indices.count()).unwrap();

    assert_eq!(buffer.current_size(), 3);
    assert_eq!(buffer.available_size(), 3);
    assert_eq!(buffer.capacity(), 6);
}

#[test]
fn test_index_buffer_rejects_overflow() {
    let mut buffer = IndexBuffer::new(IndexType::U16, 2);
    let indices = IndexStorage::from_indices(IndexType::U16, &[0, 1, 2]);

    let result = buffer.upload_data(indices.as_bytes(), indices.count());

    assert!(matches!(result, Err(Error::CapacityExceeded(_))));
    assert_eq!(buffer.current_size(), 0);
}

#[test]
fn test_index_buffer_rejects_wrong_width() {
    let mut buffer = IndexBuffer::new(IndexType::U16, 8);
    let indices = IndexStorage::from_indices(IndexType::U32, &[0, 1, 2]);

    let result = buffer.upload_data(indices.as_bytes(), indices.count());

    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_index_buffer_materializes_as_index_usage() {
    let mut ctx = MockGraphicsContext::gl_cached();
    let mut buffer = IndexBuffer::new(IndexType::U32, 4);
    let indices = IndexStorage::from_indices(IndexType::U32, &[3, 2]);
    buffer.upload_data(indices.as_bytes(), 2).unwrap();

    buffer.move_to_gpu(&mut ctx).unwrap();

    assert!(buffer.is_materialized());
    assert_eq!(buffer.gpu_buffer().unwrap().usage(), BufferUsage::Index);
    let contents = ctx.buffer_contents("index#0").unwrap();
    assert_eq!(&contents[0..8], indices.as_bytes());
}

#[test]
fn test_index_buffer_update_replaces_content() {
    let mut ctx = MockGraphicsContext::gl_cached();
    let mut buffer = IndexBuffer::new(IndexType::U16, 4);
    buffer.upload_data(IndexStorage::from_indices(IndexType::U16, &[1, 1, 1]).as_bytes(), 3).unwrap();
    buffer.move_to_gpu(&mut ctx).unwrap();

    let replacement = IndexStorage::from_indices(IndexType::U16, &[9, 8]);
    buffer.update_data(replacement.as_bytes(), 2).unwrap();

    assert_eq!(buffer.current_size(), 2);
    let contents = ctx.buffer_contents("index#0").unwrap();
    assert_eq!(&contents[0..4], replacement.as_bytes());
    assert_eq!(&contents[4..6], &1u16.to_ne_bytes());
}
