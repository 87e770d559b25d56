//! # Error Types
//!
//! Every setup step of the viewer returns [`Result`], carrying a [`RendererError`] that names the
//! failing stage. Setup is attempt-once: the first failure short-circuits the remaining steps and
//! is reported to the window host, which aborts startup.
//!
//! Per-frame work has no error path of its own. Surface hiccups are handled inside the renderer
//! (see [`crate::renderer::FrameOutcome`]) and a degenerate camera update is clamped silently.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by all setup operations.
pub type Result<T, E = RendererError> = std::result::Result<T, E>;

/// The distinguishable causes of a failed renderer setup.
#[derive(Debug, Error)]
pub enum RendererError {
    /// No surface, compatible adapter, or logical device could be obtained.
    #[error("no compatible graphics device: {0}")]
    DeviceUnavailable(String),

    /// The presentation surface was requested with a zero dimension.
    #[error("surface size {width}x{height} is not drawable")]
    InvalidSurfaceSize { width: u32, height: u32 },

    /// A GPU resource was rejected by the device (validation or out-of-memory).
    #[error("failed to allocate {resource}: {reason}")]
    ResourceAllocationFailed {
        resource: &'static str,
        reason: String,
    },

    /// A shader asset could not be read from disk.
    #[error("cannot read shader source {}: {source}", path.display())]
    ShaderSourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shader asset failed to parse or validate, or lacks the requested entry point.
    #[error("shader {} failed to compile:\n{diagnostics}", path.display())]
    ShaderCompileFailed { path: PathBuf, diagnostics: String },

    /// The vertex input layout does not match the vertex entry point's inputs.
    #[error("input layout does not match `{entry_point}`: {reason}")]
    LayoutMismatch { entry_point: String, reason: String },

    /// The camera was configured with `up` parallel to its view direction.
    #[error("camera up vector is parallel to the view direction")]
    DegenerateCamera,
}

impl RendererError {
    /// Short, stable name of the failure kind, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeviceUnavailable(_) => "device-unavailable",
            Self::InvalidSurfaceSize { .. } => "invalid-surface-size",
            Self::ResourceAllocationFailed { .. } => "resource-allocation-failed",
            Self::ShaderSourceUnreadable { .. } => "shader-source-unreadable",
            Self::ShaderCompileFailed { .. } => "shader-compile-failed",
            Self::LayoutMismatch { .. } => "layout-mismatch",
            Self::DegenerateCamera => "degenerate-camera",
        }
    }
}
