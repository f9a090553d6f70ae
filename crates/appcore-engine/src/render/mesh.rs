use wgpu::util::DeviceExt;

use crate::core::{AttributeKind, VertexAttribute};

/// Immutable vertex data on the GPU.
pub struct VertexBuffer {
    buffer: wgpu::Buffer,
    floats: usize,
}

impl VertexBuffer {
    pub fn new(device: &wgpu::Device, data: &[f32]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("appcore triangle vbo"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            buffer,
            floats: data.len(),
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of `f32` values uploaded.
    pub fn len(&self) -> usize {
        self.floats
    }

    pub fn is_empty(&self) -> bool {
        self.floats == 0
    }
}

/// A vertex buffer bound to one shader input slot.
///
/// The attribute format is resolved when a program is linked against it.
pub struct VertexArray {
    buffer: wgpu::Buffer,
    attribute: VertexAttribute,
    vertex_count: u32,
}

impl VertexArray {
    pub fn new(buffer: &VertexBuffer, attribute: VertexAttribute) -> Self {
        Self {
            buffer: buffer.buffer.clone(),
            attribute,
            vertex_count: whole_vertices(buffer.len(), attribute.stride),
        }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn attribute(&self) -> VertexAttribute {
        self.attribute
    }

    /// Whole vertices available in the bound buffer.
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

fn whole_vertices(floats: usize, stride: u64) -> u32 {
    let stride_floats = (stride as usize / std::mem::size_of::<f32>()).max(1);
    (floats / stride_floats) as u32
}

/// Vertex format for an attribute, if wgpu has one.
///
/// Float components are never normalized, so `normalized` does not affect
/// the result.
pub fn vertex_format(attribute: &VertexAttribute) -> Option<wgpu::VertexFormat> {
    match (attribute.kind, attribute.components) {
        (AttributeKind::Float32, 1) => Some(wgpu::VertexFormat::Float32),
        (AttributeKind::Float32, 2) => Some(wgpu::VertexFormat::Float32x2),
        (AttributeKind::Float32, 3) => Some(wgpu::VertexFormat::Float32x3),
        (AttributeKind::Float32, 4) => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}
