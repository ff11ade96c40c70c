//! Vertex layout keys.
//!
//! A `VertexLayoutKey` describes one attribute stream: which attributes it
//! carries, how they are laid out inside an element, and whether the stream
//! is static (written once per batch) or dynamic (patched in place).
//!
//! Keys compare by content. Two keys built from the same declarations are
//! the same key and therefore address the same buffer.
//!
//! # Example
//!
//! ```
//! use meridian_gpu::meridian::layout::VertexLayoutKey;
//! use meridian_gpu::meridian::device::ComponentType;
//!
//! let key = VertexLayoutKey::builder(1)
//!     .attribute("a_position", 2, ComponentType::Float)
//!     .attribute("a_normal", 2, ComponentType::Float)
//!     .build();
//!
//! assert_eq!(key.element_size(), 16);
//! assert_eq!(key.attributes()[1].offset, 8);
//! ```

use std::sync::Arc;

use crate::graphics_device::ComponentType;

// ============================================================================
// ATTRIBUTE DECL
// ============================================================================

/// One attribute inside a vertex element
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeDecl {
    /// Shader input name, resolved through the bound program
    pub name: String,
    /// Number of components (1..=4)
    pub component_count: u8,
    /// Type of each component
    pub component_type: ComponentType,
    /// Distance in bytes between two consecutive elements (0 = tightly packed)
    pub stride: u32,
    /// Offset in bytes of this attribute inside an element
    pub offset: u32,
}

impl AttributeDecl {
    /// Size in bytes of this attribute
    pub fn size_bytes(&self) -> u32 {
        self.component_count as u32 * self.component_type.size_bytes()
    }
}

// ============================================================================
// VERTEX LAYOUT KEY
// ============================================================================

/// Immutable descriptor of an attribute stream, used as a buffer map key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexLayoutKey {
    id: u16,
    dynamic: bool,
    attributes: Arc<[AttributeDecl]>,
}

impl VertexLayoutKey {
    /// Create a key from explicit declarations
    pub fn new(id: u16, dynamic: bool, attributes: Vec<AttributeDecl>) -> Self {
        Self {
            id,
            dynamic,
            attributes: attributes.into(),
        }
    }

    /// Start building a key with auto-computed offsets
    pub fn builder(id: u16) -> VertexLayoutBuilder {
        VertexLayoutBuilder::new(id)
    }

    /// Application-level stream id
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Whether the stream is patched in place after upload
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Attribute declarations in element order
    pub fn attributes(&self) -> &[AttributeDecl] {
        &self.attributes
    }

    /// Number of attributes
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Size in bytes of one element
    ///
    /// The stride of the first attribute when set, otherwise the packed
    /// size of all attributes.
    pub fn element_size(&self) -> u32 {
        let Some(first) = self.attributes.first() else {
            return 0;
        };
        if first.stride != 0 {
            return first.stride;
        }
        self.attributes.iter().map(AttributeDecl::size_bytes).sum()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder accumulating attributes with consecutive offsets
pub struct VertexLayoutBuilder {
    id: u16,
    dynamic: bool,
    stride: Option<u32>,
    attributes: Vec<(String, u8, ComponentType)>,
}

impl VertexLayoutBuilder {
    fn new(id: u16) -> Self {
        Self {
            id,
            dynamic: false,
            stride: None,
            attributes: Vec::new(),
        }
    }

    /// Mark the stream as dynamic
    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// Append an attribute after the previous ones
    pub fn attribute(mut self, name: &str, component_count: u8, component_type: ComponentType) -> Self {
        self.attributes.push((name.to_string(), component_count, component_type));
        self
    }

    /// Override the element stride (for padded elements)
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Finish the key
    pub fn build(self) -> VertexLayoutKey {
        let packed: u32 = self.attributes.iter()
            .map(|(_, count, ty)| *count as u32 * ty.size_bytes())
            .sum();
        let stride = self.stride.unwrap_or(packed);

        let mut offset = 0;
        let attributes = self.attributes.into_iter()
            .map(|(name, component_count, component_type)| {
                let decl = AttributeDecl {
                    name,
                    component_count,
                    component_type,
                    stride,
                    offset,
                };
                offset += decl.size_bytes();
                decl
            })
            .collect();

        VertexLayoutKey::new(self.id, self.dynamic, attributes)
    }
}

#[cfg(test)]
#[path = "layout_key_tests.rs"]
mod tests;
