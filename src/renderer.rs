//! # Renderer
//!
//! The `Renderer` ties the viewer together: it owns the graphics context, the frame targets, the
//! uploaded mesh, the constant buffer and the scene pipeline, plus the CPU-side [`FrameState`].
//!
//! ## Setup
//!
//! [`Renderer::create`] runs every setup step once, in order, and stops at the first failure:
//!
//! 1. reject a zero-sized surface, compile both shaders and check them against the vertex layout
//!    (CPU only),
//! 2. build the camera and transform state (CPU only),
//! 3. acquire the device and configure the surface,
//! 4. create the depth/stencil target and viewport at the configured surface size,
//! 5. upload the mesh,
//! 6. create the constant buffer and its binding,
//! 7. build the render pipeline.
//!
//! Broken shader assets or a degenerate camera therefore fail before the window's surface is
//! touched. Everything created before a failure is dropped on the way out.
//!
//! ## Frame Loop
//!
//! [`Renderer::run_frame`] performs one tick: [`Renderer::update`] refreshes the constant buffer
//! from the pointer input, [`Renderer::render`] records the scene into the current swap chain image,
//! and [`Renderer::present`] submits it. Presentation is vsync-paced by the surface configuration.

use web_time::Instant;

use crate::camera::PointerInput;
use crate::config::RendererConfig;
use crate::error::Result;
use crate::geometry::GeometryStore;
use crate::gpu::{check_surface_size, GraphicsContext};
use crate::scene::FrameState;
use crate::shader::{CompiledShaders, ShaderPipeline, TargetFormats};
use crate::targets::{acquire_color, Acquire, ColorTarget, FrameTargets};
use crate::uniform_binding::UniformBinding;
use crate::vertex::Mesh;

/// Ticks between frame-time log lines.
const FRAME_LOG_INTERVAL: u32 = 600;

/// What became of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No swap chain image was available; the surface was reconfigured if needed.
    Skipped,
    /// The surface can no longer be presented to. The host should shut down.
    Exit,
}

/// A recorded frame waiting for [`Renderer::present`].
pub struct PendingFrame {
    color: ColorTarget,
    commands: wgpu::CommandBuffer,
}

/// Owns every GPU resource of the viewer and runs the frame loop.
pub struct Renderer {
    gpu: GraphicsContext,
    targets: FrameTargets,
    geometry: GeometryStore,
    uniform: UniformBinding,
    pipeline: ShaderPipeline,
    frame: FrameState,
    clear_color: wgpu::Color,
    timer: FrameTimer,
}

impl Renderer {
    /// Builds every GPU resource for a `width` x `height` surface on `target`.
    ///
    /// # Errors
    ///
    /// The first failing setup step's [`crate::RendererError`].
    pub async fn create(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        config: &RendererConfig,
    ) -> Result<Self> {
        check_surface_size(width, height)?;
        let shaders = CompiledShaders::compile(&config.shaders)?;
        let frame = FrameState::new(config, width, height)?;

        let gpu = GraphicsContext::create(target, width, height).await?;

        let (surface_width, surface_height) = (gpu.width(), gpu.height());
        let targets = gpu
            .scoped("frame targets", |device| {
                FrameTargets::new(
                    device,
                    surface_width,
                    surface_height,
                    config.mesh.needs_depth(),
                )
            })
            .await?;

        let mesh = Mesh::for_kind(config.mesh);
        let geometry = gpu
            .scoped("geometry buffers", |device| GeometryStore::upload(device, &mesh))
            .await?;

        let uniform = gpu.scoped("constant buffer", UniformBinding::new).await?;

        let pipeline = ShaderPipeline::build(
            &gpu.device,
            &shaders,
            TargetFormats {
                color: gpu.surface_format,
                depth: targets.depth_format(),
            },
            &uniform.bind_group_layout,
        )
        .await?;

        uniform.update_buffer(&gpu.queue, &frame.transform().constant_buffer());

        log::info!(
            "Renderer ready: {:?} with {} triangles",
            config.mesh,
            mesh.triangle_count()
        );

        Ok(Self {
            gpu,
            targets,
            geometry,
            uniform,
            pipeline,
            frame,
            clear_color: config.clear_color,
            timer: FrameTimer::new(),
        })
    }

    pub fn graphics(&self) -> &GraphicsContext {
        &self.gpu
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    /// One full tick: update, render, present.
    pub fn run_frame(&mut self, input: &PointerInput) -> FrameOutcome {
        self.update(input);
        let outcome = match self.render() {
            Ok(frame) => self.present(frame),
            Err(outcome) => outcome,
        };
        self.timer.tick();
        outcome
    }

    /// Advances the scene state and queues the new constant buffer contents.
    pub fn update(&mut self, input: &PointerInput) {
        let data = self.frame.update(input);
        self.uniform.update_buffer(&self.gpu.queue, &data);
    }

    /// Records the scene into this frame's swap chain image.
    ///
    /// Returns the outcome instead of a frame when no image could be acquired.
    pub fn render(&self) -> std::result::Result<PendingFrame, FrameOutcome> {
        let color = match acquire_color(&self.gpu) {
            Acquire::Ready(color) => color,
            Acquire::Skip => return Err(FrameOutcome::Skipped),
            Acquire::Fatal(err) => {
                log::error!("Cannot present to the surface: {err}");
                return Err(FrameOutcome::Exit);
            }
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        encoder.insert_debug_marker("Render scene");

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &color.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: self.targets.depth.as_ref().map(|d| d.attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.targets.viewport.apply(&mut render_pass);
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform.bind_group, &[]);
            self.geometry.bind(&mut render_pass);
            render_pass.draw_indexed(0..self.geometry.index_count, 0, 0..1);
        }

        Ok(PendingFrame {
            color,
            commands: encoder.finish(),
        })
    }

    /// Submits a recorded frame and hands the image to the display.
    pub fn present(&self, frame: PendingFrame) -> FrameOutcome {
        self.gpu.queue.submit(std::iter::once(frame.commands));
        frame.color.present();
        FrameOutcome::Presented
    }
}

/// Rolling frame-time average, logged every [`FRAME_LOG_INTERVAL`] ticks.
struct FrameTimer {
    window_start: Instant,
    ticks: u32,
}

impl FrameTimer {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            ticks: 0,
        }
    }

    fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks < FRAME_LOG_INTERVAL {
            return;
        }
        let elapsed = self.window_start.elapsed();
        log::debug!(
            "Average frame time {:.2} ms over {} frames",
            elapsed.as_secs_f64() * 1000.0 / self.ticks as f64,
            self.ticks
        );
        self.window_start = Instant::now();
        self.ticks = 0;
    }
}
