//! # Viewer Configuration
//!
//! Plain-data configuration handed to the window host and the renderer at startup. Nothing here
//! is global: the host owns a [`ViewerConfig`] and passes the pieces down explicitly.
//!
//! The defaults reproduce the reference scene: a 1500x1000 window, a vertex-colored cube seen from
//! `(0, 0.7, 1.5)` through a 70 degree vertical field of view.

use std::path::{Path, PathBuf};

use crate::shader::ShaderStage;

/// Environment variable that relocates the default shader assets.
pub const SHADER_DIR_ENV: &str = "CUBE_VIEWER_SHADER_DIR";

/// Top-level configuration for one viewer process.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
}

/// Process-scoped window parameters, consumed once when the window is created.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in physical pixels.
    pub width: u32,
    /// Inner height in physical pixels.
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Cube Viewer".to_owned(),
            width: 1500,
            height: 1000,
        }
    }
}

/// Which static mesh the geometry store uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshKind {
    /// A single flat triangle. Drawn without a depth target.
    Triangle,
    /// An eight-corner cube with per-corner colors.
    #[default]
    Cube,
}

impl MeshKind {
    /// Whether the mesh needs per-pixel depth resolution.
    pub fn needs_depth(self) -> bool {
        matches!(self, MeshKind::Cube)
    }
}

/// Everything the renderer needs beyond the surface itself.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub mesh: MeshKind,
    /// Spin the model about +Y while the camera is idle.
    pub auto_rotate: bool,
    /// Model rotation per idle tick, in radians.
    pub rotation_per_tick: f32,
    pub clear_color: wgpu::Color,
    pub shaders: ShaderSet,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mesh: MeshKind::default(),
            auto_rotate: true,
            rotation_per_tick: 0.01,
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.2,
                b: 0.4,
                a: 1.0,
            },
            shaders: ShaderSet::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

/// One shader stage: where its text lives and how to compile it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderAsset {
    pub path: PathBuf,
    pub entry_point: String,
    pub stage: ShaderStage,
}

impl ShaderAsset {
    pub fn new(path: impl Into<PathBuf>, entry_point: impl Into<String>, stage: ShaderStage) -> Self {
        Self {
            path: path.into(),
            entry_point: entry_point.into(),
            stage,
        }
    }
}

/// The vertex and fragment stages of the scene pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSet {
    pub vertex: ShaderAsset,
    pub fragment: ShaderAsset,
}

impl ShaderSet {
    /// The bundled scene shaders, resolved against `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            vertex: ShaderAsset::new(dir.join("scene.vert.wgsl"), "vs_main", ShaderStage::Vertex),
            fragment: ShaderAsset::new(dir.join("scene.frag.wgsl"), "fs_main", ShaderStage::Fragment),
        }
    }
}

impl Default for ShaderSet {
    fn default() -> Self {
        let dir = std::env::var_os(SHADER_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders"));
        Self::in_dir(&dir)
    }
}

/// Initial camera placement and the arcball tuning constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    /// Orbit pivot.
    pub at: [f32; 3],
    pub up: [f32; 3],
    /// Updates whose `|cos|` between view direction and `up` reaches this value are rejected.
    pub gimbal_threshold: f32,
    /// World units of dolly per unit of wheel delta.
    pub zoom_scale: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.7, 1.5],
            at: [0.0, -0.1, 0.0],
            up: [0.0, 1.0, 0.0],
            gimbal_threshold: 0.99,
            zoom_scale: 1.0 / 1000.0,
        }
    }
}

/// Perspective parameters. The projection is computed once per session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Aspect ratio below which the vertical field of view widens to keep horizontal fit.
    pub reference_aspect: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            near: 0.01,
            far: 100.0,
            reference_aspect: 16.0 / 9.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn shader_set_resolves_against_directory() {
        let set = ShaderSet::in_dir(Path::new("/assets"));
        assert_eq!(set.vertex.path, PathBuf::from("/assets/scene.vert.wgsl"));
        assert_eq!(set.vertex.entry_point, "vs_main");
        assert_eq!(set.vertex.stage, ShaderStage::Vertex);
        assert_eq!(set.fragment.path, PathBuf::from("/assets/scene.frag.wgsl"));
        assert_eq!(set.fragment.stage, ShaderStage::Fragment);
    }

    #[test]
    fn only_the_cube_needs_depth() {
        assert!(MeshKind::Cube.needs_depth());
        assert!(!MeshKind::Triangle.needs_depth());
    }

    #[test]
    fn defaults_match_reference_scene() {
        let config = ViewerConfig::default();
        assert_eq!((config.window.width, config.window.height), (1500, 1000));
        assert_eq!(config.renderer.projection.fov_y_degrees, 70.0);
        assert_eq!(config.renderer.camera.gimbal_threshold, 0.99);
        assert_eq!(config.renderer.camera.zoom_scale, 0.001);
    }
}
