//! # Cube Viewer Library
//!
//! This library renders a single static mesh, either a flat triangle or a vertex-colored cube,
//! through `wgpu`, and lets the user orbit around it with an arcball camera. It is organized into
//! small modules that each own one stage of the pipeline from window input to presented frame.
//!
//! ## Modules
//!
//! - [`app`]: Window host. Creates the window, translates its events and drives the frame loop.
//! - [`renderer`]: Owns every GPU resource and runs one update/render/present tick per frame.
//! - [`gpu`]: Acquires the device, queue and presentation surface.
//! - [`targets`]: Depth/stencil target, viewport and per-frame swap chain image.
//! - [`geometry`]: Uploads the mesh into immutable vertex and index buffers.
//! - [`shader`]: Compiles WGSL assets, checks them against the vertex layout, builds the pipeline.
//! - [`transform`]: Projection, view and model matrices and their composition.
//! - [`camera`]: The arcball camera and its gimbal guard.
//! - [`scene`]: CPU-side per-tick state feeding the constant buffer.
//! - [`input`]: Pointer tracking between ticks.
//! - [`vertex`]: The vertex layout and the two static meshes.
//! - [`uniform_buffer`] / [`uniform_binding`]: The constant buffer and its bind group.
//! - [`config`]: Plain-data configuration passed down from the host.
//! - [`error`]: The setup error type.
//!
//! ## Data Flow
//!
//! Data moves in one direction per frame:
//!
//! ```text
//! pointer input → ArcballCamera → TransformState → constant buffer → pipeline → render → present
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use cube_viewer::{App, ViewerConfig};
//! use winit::event_loop::{ControlFlow, EventLoop};
//!
//! let event_loop = EventLoop::new().unwrap();
//! event_loop.set_control_flow(ControlFlow::Poll);
//!
//! let mut app = App::new(ViewerConfig::default());
//! event_loop.run_app(&mut app).unwrap();
//!
//! if let Some(err) = app.take_setup_error() {
//!     eprintln!("setup failed: {err}");
//! }
//! ```
//!
//! ## Dependencies
//!
//! - `wgpu`: Device, surface, buffers and pipelines.
//! - `naga`: WGSL parsing, validation and entry point reflection ahead of pipeline creation.
//! - `winit`: Window and event management.
//! - `nalgebra-glm`: Matrix and vector math.
//! - `log` and `env_logger`: Logging.
//! - `thiserror`: The setup error type.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod gpu;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod shader;
pub mod targets;
pub mod transform;
pub mod uniform_binding;
pub mod uniform_buffer;
pub mod vertex;

pub use crate::app::App;
pub use crate::camera::{ArcballCamera, CameraState, CameraUpdate, PointerInput};
pub use crate::config::{
    CameraConfig, MeshKind, ProjectionConfig, RendererConfig, ShaderAsset, ShaderSet,
    ViewerConfig, WindowConfig,
};
pub use crate::error::{RendererError, Result};
pub use crate::geometry::GeometryStore;
pub use crate::gpu::GraphicsContext;
pub use crate::renderer::{FrameOutcome, Renderer};
pub use crate::scene::FrameState;
pub use crate::shader::{CompiledShader, CompiledShaders, ShaderPipeline, ShaderStage};
pub use crate::targets::FrameTargets;
pub use crate::transform::{compose_frame, compute_projection, TransformState};
pub use crate::uniform_buffer::ConstantBufferData;
pub use crate::vertex::{Mesh, Vertex};

/// Default `env_logger` filter for the viewer binary. `RUST_LOG` overrides it.
pub const DEFAULT_LOG_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=off,naga=warn";
