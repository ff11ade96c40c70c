use super::*;
use crate::graphics_device::ComponentType;

fn layout(id: u16) -> VertexLayoutKey {
    VertexLayoutKey::builder(id)
        .attribute("a_position", 3, ComponentType::Float)
        .build()
}

#[test]
fn test_get_or_create_uses_key_element_size() {
    let mut map = BufferMap::new();

    let buffer = map.get_or_create(&layout(0), 50);

    assert_eq!(buffer.element_size(), 12);
    assert_eq!(buffer.capacity(), 50);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_equal_keys_share_one_buffer() {
    let mut map = BufferMap::new();

    map.get_or_create(&layout(1), 10).upload_data(&[0; 12], 1).unwrap();
    let again = map.get_or_create(&layout(1), 99);

    assert_eq!(again.current_size(), 1);
    assert_eq!(again.capacity(), 10);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_get_does_not_create() {
    let mut map = BufferMap::new();

    assert!(map.get(&layout(4)).is_none());
    assert!(map.get_mut(&layout(4)).is_none());
    assert!(map.is_empty());

    map.get_or_create(&layout(4), 1);
    assert!(map.contains(&layout(4)));
    assert!(map.get(&layout(4)).is_some());
}

#[test]
fn test_iteration_follows_key_order() {
    let mut map = BufferMap::new();
    map.get_or_create(&layout(3), 1);
    map.get_or_create(&layout(1), 1);
    map.get_or_create(&layout(2), 1);

    let ids: Vec<u16> = map.iter().map(|(key, _)| key.id()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(map.values().count(), 3);
}
