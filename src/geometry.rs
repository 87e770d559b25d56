//! Immutable GPU copies of a [`Mesh`].

use crate::vertex::{Mesh, Vertex};

/// Vertex and index buffers for one mesh, uploaded once and never written again.
pub struct GeometryStore {
    /// `VERTEX` buffer, exactly `vertex_count * 24` bytes.
    pub vertex_buffer: wgpu::Buffer,

    /// `INDEX` buffer of 32-bit indices, exactly `index_count * 4` bytes.
    pub index_buffer: wgpu::Buffer,

    pub vertex_count: u32,
    pub index_count: u32,
}

impl GeometryStore {
    pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

    /// Creates both buffers with their contents in place.
    ///
    /// Run inside [`crate::gpu::GraphicsContext::scoped`] to turn device-side allocation failures
    /// into errors.
    pub fn upload(device: &wgpu::Device, mesh: &Mesh) -> Self {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Vertex Buffer"),
                contents: bytemuck::cast_slice(mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Index Buffer"),
                contents: bytemuck::cast_slice(mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        log::debug!(
            "Uploaded {} vertices ({} bytes) and {} indices",
            mesh.vertices.len(),
            vertex_buffer.size(),
            mesh.indices.len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            vertex_count: mesh.vertices.len() as u32,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Byte size the vertex buffer must have for `vertex_count` vertices.
    pub fn vertex_bytes(vertex_count: usize) -> wgpu::BufferAddress {
        vertex_count as wgpu::BufferAddress * Vertex::STRIDE
    }

    pub fn index_bytes(index_count: usize) -> wgpu::BufferAddress {
        (index_count * std::mem::size_of::<u32>()) as wgpu::BufferAddress
    }

    /// Binds both buffers on `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), Self::INDEX_FORMAT);
    }
}
