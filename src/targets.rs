//! # Frame Targets
//!
//! Per-frame render destinations: the swap chain image the scene is drawn into, the depth/stencil
//! texture that resolves visibility between cube faces, and the viewport covering the full surface.
//!
//! The depth texture and viewport are created once, sized to the surface. The color target is
//! acquired from the surface at the start of every frame and handed back with
//! [`ColorTarget::present`].

use crate::gpu::GraphicsContext;

/// Depth/stencil format of the scene. 24-bit depth with an 8-bit stencil.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Full-surface viewport with the canonical `0..1` depth range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    pub fn apply(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_viewport(
            self.x,
            self.y,
            self.width,
            self.height,
            self.min_depth,
            self.max_depth,
        );
    }
}

/// Depth/stencil texture matching the surface size.
pub struct DepthTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Depth Texture View"),
            format: Some(DEPTH_FORMAT),
            dimension: Some(wgpu::TextureViewDimension::D2),
            aspect: wgpu::TextureAspect::All,
            ..Default::default()
        });
        Self { texture, view }
    }

    /// Attachment that clears depth to 1.0 and stencil to 0 at the start of the pass.
    pub fn attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: &self.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0),
                store: wgpu::StoreOp::Store,
            }),
        }
    }
}

/// Size-dependent targets, created once per session.
pub struct FrameTargets {
    pub viewport: Viewport,
    /// Absent when the mesh is drawn without depth testing.
    pub depth: Option<DepthTarget>,
}

impl FrameTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32, with_depth: bool) -> Self {
        Self {
            viewport: Viewport::full(width, height),
            depth: with_depth.then(|| DepthTarget::new(device, width, height)),
        }
    }

    pub fn depth_format(&self) -> Option<wgpu::TextureFormat> {
        self.depth.as_ref().map(|_| DEPTH_FORMAT)
    }
}

/// The swap chain image for one frame, with a render-target view over it.
pub struct ColorTarget {
    surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl ColorTarget {
    pub fn present(self) {
        self.surface_texture.present();
    }
}

/// Outcome of asking the surface for this frame's image.
pub enum Acquire {
    Ready(ColorTarget),
    /// The surface was lost, outdated or timed out; nothing is drawn this tick.
    Skip,
    /// The device cannot continue presenting.
    Fatal(wgpu::SurfaceError),
}

/// Acquires the current swap chain image. Lost or outdated surfaces are reconfigured and skipped.
pub fn acquire_color(ctx: &GraphicsContext) -> Acquire {
    match ctx.surface.get_current_texture() {
        Ok(surface_texture) => {
            let view = surface_texture
                .texture
                .create_view(&wgpu::TextureViewDescriptor {
                    label: Some("Back Buffer View"),
                    format: Some(ctx.surface_format),
                    ..Default::default()
                });
            Acquire::Ready(ColorTarget {
                surface_texture,
                view,
            })
        }
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::warn!("Surface lost or outdated, reconfiguring");
            ctx.reconfigure();
            Acquire::Skip
        }
        Err(wgpu::SurfaceError::Timeout) => {
            log::warn!("Timed out waiting for the next swap chain image");
            Acquire::Skip
        }
        Err(err) => Acquire::Fatal(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_covers_surface_with_unit_depth() {
        let vp = Viewport::full(1500, 1000);
        assert_eq!((vp.x, vp.y, vp.width, vp.height), (0.0, 0.0, 1500.0, 1000.0));
        assert_eq!((vp.min_depth, vp.max_depth), (0.0, 1.0));
    }

    #[test]
    fn depth_format_carries_stencil() {
        assert!(DEPTH_FORMAT.has_depth_aspect());
        assert!(DEPTH_FORMAT.has_stencil_aspect());
    }
}
