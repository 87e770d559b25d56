use std::fs;

use cube_viewer::{Renderer, RendererConfig, RendererError, ShaderSet};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};

/// A window that never hands out a handle. Setup must fail before asking for one.
struct NoWindow;

impl HasWindowHandle for NoWindow {
    fn window_handle(&self) -> Result<WindowHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

impl HasDisplayHandle for NoWindow {
    fn display_handle(&self) -> Result<DisplayHandle<'_>, HandleError> {
        Err(HandleError::Unavailable)
    }
}

fn config_with_shaders(dir: &std::path::Path) -> RendererConfig {
    RendererConfig {
        shaders: ShaderSet::in_dir(dir),
        ..RendererConfig::default()
    }
}

#[test]
fn shader_syntax_error_aborts_setup() {
    let dir = tempfile::tempdir().unwrap();
    let shipped = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    fs::copy(shipped.join("scene.frag.wgsl"), dir.path().join("scene.frag.wgsl")).unwrap();
    fs::write(
        dir.path().join("scene.vert.wgsl"),
        "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0) ",
    )
    .unwrap();

    let result = pollster::block_on(Renderer::create(
        NoWindow,
        800,
        400,
        &config_with_shaders(dir.path()),
    ));
    match result {
        Err(RendererError::ShaderCompileFailed { path, diagnostics }) => {
            assert_eq!(path, dir.path().join("scene.vert.wgsl"));
            assert!(!diagnostics.is_empty());
        }
        Err(other) => panic!("expected a shader compile failure, got {other}"),
        Ok(_) => panic!("setup succeeded with a broken shader"),
    }
}

#[test]
fn missing_shader_asset_aborts_setup() {
    let dir = tempfile::tempdir().unwrap();
    let result = pollster::block_on(Renderer::create(
        NoWindow,
        800,
        400,
        &config_with_shaders(dir.path()),
    ));
    assert!(matches!(
        result,
        Err(RendererError::ShaderSourceUnreadable { .. })
    ));
}

#[test]
fn mismatched_vertex_inputs_abort_setup() {
    let dir = tempfile::tempdir().unwrap();
    let shipped = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    fs::copy(shipped.join("scene.frag.wgsl"), dir.path().join("scene.frag.wgsl")).unwrap();
    let vertex = fs::read_to_string(shipped.join("scene.vert.wgsl"))
        .unwrap()
        .replace("@location(1) color: vec3<f32>,\n}", "@location(1) color: vec2<f32>,\n}")
        .replace("out.color = input.color;", "out.color = vec3<f32>(input.color, 1.0);");
    fs::write(dir.path().join("scene.vert.wgsl"), vertex).unwrap();

    let result = pollster::block_on(Renderer::create(
        NoWindow,
        800,
        400,
        &config_with_shaders(dir.path()),
    ));
    assert!(matches!(result, Err(RendererError::LayoutMismatch { .. })));
}

#[test]
fn zero_sized_surface_aborts_setup() {
    let result = pollster::block_on(Renderer::create(
        NoWindow,
        0,
        400,
        &RendererConfig::default(),
    ));
    assert!(matches!(
        result,
        Err(RendererError::InvalidSurfaceSize { width: 0, height: 400 })
    ));
}
