//! # Constant Buffer Data
//!
//! This module defines [`ConstantBufferData`], the CPU-side mirror of the per-frame uniform block
//! read by the vertex stage:
//!
//! ```wgsl
//! struct Transform {
//!     mvp: mat4x4<f32>,
//! }
//! @group(0) @binding(0) var<uniform> transform: Transform;
//! ```
//!
//! ## Matrix Layout
//!
//! `nalgebra-glm` stores matrices column-major and WGSL reads `mat4x4<f32>` column-major, so the
//! composed matrix is copied as-is. Backends that consume row-major constant buffers would need a
//! transpose here, and only here: [`ConstantBufferData::from_matrix`] is the single point where
//! CPU matrices cross into GPU layout.
//!
//! ## Size
//!
//! Uniform blocks must be a multiple of 16 bytes. The block is one 64-byte matrix, checked at
//! compile time below.

use nalgebra_glm as glm;

/// GPU-visible mirror of the composed model-view-projection matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ConstantBufferData {
    /// `projection * view * model`, column-major.
    pub mvp: glm::Mat4,
}

const _: () = assert!(std::mem::size_of::<ConstantBufferData>() == 64);
const _: () = assert!(std::mem::size_of::<ConstantBufferData>() % 16 == 0);

impl ConstantBufferData {
    /// Size of the uniform block in bytes.
    pub const SIZE: wgpu::BufferAddress =
        std::mem::size_of::<ConstantBufferData>() as wgpu::BufferAddress;

    /// Converts a composed MVP matrix into upload layout.
    pub fn from_matrix(mvp: &glm::Mat4) -> Self {
        Self { mvp: *mvp }
    }
}

impl Default for ConstantBufferData {
    fn default() -> Self {
        Self {
            mvp: glm::Mat4::identity(),
        }
    }
}
