//! # GPU Context Module
//!
//! The `gpu` module owns the objects every other part of the renderer depends on: the logical
//! device, its command queue, and the presentation surface (the swap chain).
//!
//! ## Overview
//!
//! [`GraphicsContext::create`] performs the whole acquisition sequence in one attempt:
//!
//! 1. create a `wgpu::Instance` with the build's debug/validation flags,
//! 2. create a surface for the host window,
//! 3. request a hardware adapter compatible with that surface,
//! 4. request a device and queue,
//! 5. configure the surface at the requested size with an 8-bit-per-channel format and
//!    vsync-paced (`Fifo`) presentation.
//!
//! Any failed step returns [`RendererError::DeviceUnavailable`]; objects created by earlier steps
//! are dropped on the way out. There is no retry.
//!
//! ## Error Scopes
//!
//! Resource creation in wgpu reports problems asynchronously through the device's error sink.
//! [`GraphicsContext::scoped`] wraps a creation closure in validation and out-of-memory scopes so
//! allocation failures surface as [`RendererError::ResourceAllocationFailed`] at the call site.

use crate::error::{RendererError, Result};

/// Device, queue and configured presentation surface.
pub struct GraphicsContext {
    /// Surface bound to the host window.
    ///
    /// The surface is configured once at creation. The viewer does not resize, so the same
    /// configuration is re-applied if the surface is ever lost.
    pub surface: wgpu::Surface<'static>,

    /// Logical device used to create every GPU resource.
    pub device: wgpu::Device,

    /// Immediate submission queue.
    pub queue: wgpu::Queue,

    /// The configuration last applied to [`Self::surface`].
    pub surface_config: wgpu::SurfaceConfiguration,

    /// Color format of the swap chain images.
    pub surface_format: wgpu::TextureFormat,

    adapter_info: wgpu::AdapterInfo,
}

impl GraphicsContext {
    /// Acquires a device and a presentation surface sized `width` x `height`.
    ///
    /// # Errors
    ///
    /// - [`RendererError::InvalidSurfaceSize`] if either dimension is zero.
    /// - [`RendererError::DeviceUnavailable`] if the surface, a hardware adapter, the device, or an
    ///   8-bit surface format cannot be obtained.
    pub async fn create(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        check_surface_size(width, height)?;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            flags: wgpu::InstanceFlags::from_build_config(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(target)
            .map_err(|err| RendererError::DeviceUnavailable(format!("surface creation: {err}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                RendererError::DeviceUnavailable("no adapter is compatible with the surface".into())
            })?;

        let adapter_info = adapter.get_info();
        if adapter_info.device_type == wgpu::DeviceType::Cpu {
            return Err(RendererError::DeviceUnavailable(format!(
                "adapter `{}` is a software rasterizer",
                adapter_info.name
            )));
        }
        log::info!(
            "Using adapter `{}` ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Cube Viewer Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|err| RendererError::DeviceUnavailable(format!("device request: {err}")))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let surface_format = choose_surface_format(&surface_capabilities.formats).ok_or_else(|| {
            RendererError::DeviceUnavailable(format!(
                "surface offers no 8-bit color format (have {:?})",
                surface_capabilities.formats
            ))
        })?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        log::info!("Configured {width}x{height} surface as {surface_format:?}");

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            surface_format,
            adapter_info,
        })
    }

    pub fn width(&self) -> u32 {
        self.surface_config.width
    }

    pub fn height(&self) -> u32 {
        self.surface_config.height
    }

    /// Width over height of the configured surface.
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Re-applies the session's surface configuration after the surface was lost or outdated.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Runs `create` inside validation and out-of-memory error scopes.
    ///
    /// Whatever `create` built is dropped if the device reported an error for it.
    pub async fn scoped<T>(
        &self,
        resource: &'static str,
        create: impl FnOnce(&wgpu::Device) -> T,
    ) -> Result<T> {
        capture_errors(&self.device, resource, create).await
    }
}

/// Rejects surfaces with a zero dimension.
pub fn check_surface_size(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(RendererError::InvalidSurfaceSize { width, height });
    }
    Ok(())
}

/// Error-scope wrapper usable with any device, including headless ones.
pub async fn capture_errors<T>(
    device: &wgpu::Device,
    resource: &'static str,
    create: impl FnOnce(&wgpu::Device) -> T,
) -> Result<T> {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = create(device);

    let validation = device.pop_error_scope().await;
    let out_of_memory = device.pop_error_scope().await;

    match validation.or(out_of_memory) {
        Some(err) => Err(RendererError::ResourceAllocationFailed {
            resource,
            reason: err.to_string(),
        }),
        None => Ok(value),
    }
}

/// Picks an 8-bit-per-channel swap chain format, preferring linear (non-sRGB) storage.
pub fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    use wgpu::TextureFormat as F;

    let is_eight_bit = |f: &F| {
        matches!(
            f,
            F::Rgba8Unorm | F::Bgra8Unorm | F::Rgba8UnormSrgb | F::Bgra8UnormSrgb
        )
    };

    formats
        .iter()
        .copied()
        .filter(is_eight_bit)
        .find(|f| !f.is_srgb())
        .or_else(|| formats.iter().copied().find(is_eight_bit))
}
