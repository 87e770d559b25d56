//! # Uniform Binding
//!
//! Owns the GPU-resident constant buffer together with the bind group layout and bind group that
//! expose it to the vertex stage at `@group(0) @binding(0)`.
//!
//! The buffer is created once at setup, initialised with an identity transform, and rewritten in
//! place every frame through [`UniformBinding::update_buffer`]. Its size never changes.

use crate::uniform_buffer::ConstantBufferData;

/// Constant buffer plus the binding objects the pipeline layout refers to.
pub struct UniformBinding {
    /// The uniform buffer (`UNIFORM | COPY_DST`), exactly [`ConstantBufferData::SIZE`] bytes.
    pub buffer: wgpu::Buffer,

    pub bind_group: wgpu::BindGroup,

    /// Layout shared with [`crate::shader::ShaderPipeline`] when building the pipeline layout.
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformBinding {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Constant Buffer"),
                contents: bytemuck::bytes_of(&ConstantBufferData::default()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(ConstantBufferData::SIZE),
                },
                count: None,
            }],
            label: Some("constant_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("constant_bind_group"),
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Queues a rewrite of the whole constant buffer.
    ///
    /// The write is staged by the queue and lands before the next submitted command buffer, so
    /// calling this before encoding the frame's draw is sufficient.
    pub fn update_buffer(&self, queue: &wgpu::Queue, data: &ConstantBufferData) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(data));
    }
}
