//! Fixed triangle geometry and its vertex input layout.

/// Number of vertices submitted by the triangle draw call.
pub const TRIANGLE_VERTEX_COUNT: u32 = 3;

/// Components per vertex position (`vec3`).
pub const POSITION_COMPONENTS: u32 = 3;

/// Primitive assembly mode for a draw call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Primitive {
    Triangles,
}

/// Scalar type of a vertex attribute component.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeKind {
    Float32,
}

/// Binding of raw vertex data to one shader input slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub kind: AttributeKind,
    pub normalized: bool,
    /// Bytes between consecutive vertices.
    pub stride: u64,
    /// Byte offset of the first component.
    pub offset: u64,
}

impl VertexAttribute {
    /// Tightly packed `vec3` positions at input slot 0.
    pub const fn position() -> Self {
        Self {
            location: 0,
            components: POSITION_COMPONENTS,
            kind: AttributeKind::Float32,
            normalized: false,
            stride: (POSITION_COMPONENTS as u64) * std::mem::size_of::<f32>() as u64,
            offset: 0,
        }
    }
}

/// Positions of one static triangle in normalized device coordinates.
///
/// Stored flat: three vertices of three components each.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleGeometry {
    pub positions: [[f32; 3]; 3],
}

impl TriangleGeometry {
    pub const fn new(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Self {
        Self { positions: [a, b, c] }
    }

    /// Returns the vertex data as the 9 floats uploaded to the GPU.
    pub fn as_floats(&self) -> &[f32] {
        self.positions.as_flattened()
    }
}

impl Default for TriangleGeometry {
    fn default() -> Self {
        Self::new([-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_triangle_is_nine_floats() {
        let g = TriangleGeometry::default();
        assert_eq!(g.as_floats().len(), 9);
        assert_eq!(
            g.as_floats(),
            &[-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0]
        );
    }

    #[test]
    fn position_attribute_is_tightly_packed() {
        let attr = VertexAttribute::position();
        assert_eq!(attr.location, 0);
        assert_eq!(attr.components, 3);
        assert_eq!(attr.stride, 12);
        assert_eq!(attr.offset, 0);
        assert!(!attr.normalized);
    }

    #[test]
    fn vertex_count_matches_geometry() {
        let g = TriangleGeometry::default();
        assert_eq!(
            g.as_floats().len() as u32,
            TRIANGLE_VERTEX_COUNT * POSITION_COMPONENTS
        );
    }
}
