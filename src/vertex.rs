//! # Vertex Module
//!
//! This module defines the [`Vertex`] layout shared by the CPU-side mesh tables, the GPU vertex
//! buffer, and the vertex shader's input signature, along with the two static meshes the viewer
//! can draw.
//!
//! ## Layout
//!
//! | Attribute  | Location | Format      | Offset |
//! |------------|----------|-------------|--------|
//! | `position` | 0        | `Float32x3` | 0      |
//! | `color`    | 1        | `Float32x3` | 12     |
//!
//! The stride is 24 bytes. [`Vertex::ATTRIBUTES`] is the single source of truth for this table: the
//! pipeline builds its input layout from it and the shader reflection check compares the vertex
//! entry point's `@location` inputs against it.
//!
//! ## Winding
//!
//! Front faces are wound clockwise as seen from outside the mesh, matching the pipeline's
//! `FrontFace::Cw` with back-face culling under a right-handed view transform.

use crate::config::MeshKind;

/// Represents a single vertex: an object-space position and a linear RGB color.
///
/// The struct is `#[repr(C)]` and `Pod` so vertex tables can be handed to the GPU with
/// `bytemuck::cast_slice` without any repacking.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position `[x, y, z]`.
    pub position: [f32; 3],

    /// Vertex color `[r, g, b]`, each channel in `0.0..=1.0`.
    pub color: [f32; 3],
}

impl Vertex {
    /// Shader-visible attributes, in location order.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    /// Size in bytes of one vertex in the vertex buffer.
    pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<Vertex>() as wgpu::BufferAddress;

    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    /// Returns the vertex buffer layout used by the scene pipeline.
    ///
    /// Vertices advance once per vertex (`VertexStepMode::Vertex`) with a 24-byte stride.
    pub fn description() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 24);

/// An immutable indexed triangle list.
#[derive(Debug, Clone, Copy)]
pub struct Mesh {
    pub vertices: &'static [Vertex],
    pub indices: &'static [u32],
}

impl Mesh {
    pub fn for_kind(kind: MeshKind) -> Self {
        match kind {
            MeshKind::Triangle => Self {
                vertices: &TRIANGLE_VERTICES,
                indices: &TRIANGLE_INDICES,
            },
            MeshKind::Cube => Self {
                vertices: &CUBE_VERTICES,
                indices: &CUBE_INDICES,
            },
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A flat triangle in the XY plane, facing +Z.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex::new([0.5, -0.5, 0.0], [1.0, 0.0, 0.0]),
    Vertex::new([-0.5, -0.5, 0.0], [0.0, 1.0, 0.0]),
    Vertex::new([0.0, 0.5, 0.0], [0.0, 0.0, 1.0]),
];

pub const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// The eight corners of a unit cube centred on the origin. Top corners first.
pub const CUBE_VERTICES: [Vertex; 8] = [
    Vertex::new([-0.5, 0.5, -0.5], [0.0, 0.0, 1.0]),
    Vertex::new([0.5, 0.5, -0.5], [0.0, 1.0, 0.0]),
    Vertex::new([0.5, 0.5, 0.5], [0.0, 1.0, 1.0]),
    Vertex::new([-0.5, 0.5, 0.5], [1.0, 0.0, 0.0]),
    Vertex::new([-0.5, -0.5, -0.5], [1.0, 0.0, 1.0]),
    Vertex::new([0.5, -0.5, -0.5], [1.0, 1.0, 0.0]),
    Vertex::new([0.5, -0.5, 0.5], [1.0, 1.0, 1.0]),
    Vertex::new([-0.5, -0.5, 0.5], [0.0, 0.0, 0.0]),
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u32; 36] = [
    3, 0, 1,  2, 3, 1, // top     (+Y)
    0, 4, 5,  1, 0, 5, // back    (-Z)
    3, 7, 4,  0, 3, 4, // left    (-X)
    1, 5, 6,  2, 1, 6, // right   (+X)
    2, 6, 7,  3, 2, 7, // front   (+Z)
    6, 5, 4,  7, 6, 4, // bottom  (-Y)
];

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra_glm as glm;

    fn corner(mesh: &Mesh, index: u32) -> glm::Vec3 {
        glm::Vec3::from(mesh.vertices[index as usize].position)
    }

    /// Seen from outside, a clockwise triangle's right-handed normal points inward.
    fn is_clockwise_from_outside(mesh: &Mesh, tri: &[u32]) -> bool {
        let (a, b, c) = (corner(mesh, tri[0]), corner(mesh, tri[1]), corner(mesh, tri[2]));
        let normal = (b - a).cross(&(c - a));
        let centroid = (a + b + c) / 3.0;
        normal.dot(&centroid) < 0.0
    }

    #[test]
    fn attribute_offsets_match_field_layout() {
        assert_eq!(Vertex::ATTRIBUTES[0].offset, 0);
        assert_eq!(Vertex::ATTRIBUTES[0].shader_location, 0);
        assert_eq!(Vertex::ATTRIBUTES[1].offset, 12);
        assert_eq!(Vertex::ATTRIBUTES[1].shader_location, 1);
        assert_eq!(Vertex::description().array_stride, 24);
    }

    #[test]
    fn cube_faces_wind_clockwise_from_outside() {
        let cube = Mesh::for_kind(MeshKind::Cube);
        assert_eq!(cube.triangle_count(), 12);
        for tri in cube.indices.chunks(3) {
            assert!(is_clockwise_from_outside(&cube, tri), "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn triangle_winds_clockwise_toward_positive_z() {
        let tri = Mesh::for_kind(MeshKind::Triangle);
        let (a, b, c) = (corner(&tri, 0), corner(&tri, 1), corner(&tri, 2));
        let normal = (b - a).cross(&(c - a));
        assert!(normal.z < 0.0);
    }

    #[test]
    fn every_index_addresses_a_vertex() {
        for kind in [MeshKind::Triangle, MeshKind::Cube] {
            let mesh = Mesh::for_kind(kind);
            assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        }
    }
}
