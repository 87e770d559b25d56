//! Resource creation against a real device without a window. Each test returns early when the
//! machine has no usable adapter.

use std::path::Path;

use cube_viewer::geometry::GeometryStore;
use cube_viewer::gpu::capture_errors;
use cube_viewer::shader::{CompiledShaders, ShaderPipeline, TargetFormats};
use cube_viewer::targets::{FrameTargets, DEPTH_FORMAT};
use cube_viewer::uniform_binding::UniformBinding;
use cube_viewer::{ConstantBufferData, Mesh, MeshKind, ShaderSet, Vertex};

fn headless_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }));
    let Some(adapter) = adapter else {
        eprintln!("no adapter available, skipping");
        return None;
    };

    match pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default(), None)) {
        Ok(pair) => Some(pair),
        Err(err) => {
            eprintln!("device request failed ({err}), skipping");
            None
        }
    }
}

#[test]
fn geometry_buffers_are_sized_to_the_mesh() {
    let Some((device, _queue)) = headless_device() else {
        return;
    };

    for kind in [MeshKind::Cube, MeshKind::Triangle] {
        let mesh = Mesh::for_kind(kind);
        let store = pollster::block_on(capture_errors(&device, "geometry buffers", |device| {
            GeometryStore::upload(device, &mesh)
        }))
        .unwrap();

        let stride = std::mem::size_of::<Vertex>() as u64;
        assert_eq!(store.vertex_buffer.size(), mesh.vertices.len() as u64 * stride);
        assert_eq!(store.index_buffer.size(), mesh.indices.len() as u64 * 4);
        assert_eq!(store.index_count as usize, mesh.indices.len());
    }
}

#[test]
fn constant_buffer_holds_one_matrix() {
    let Some((device, _queue)) = headless_device() else {
        return;
    };

    let binding = UniformBinding::new(&device);
    assert_eq!(binding.buffer.size(), ConstantBufferData::SIZE);
    assert_eq!(binding.buffer.size() % 16, 0);
}

#[test]
fn bundled_shaders_build_a_pipeline() {
    let Some((device, _queue)) = headless_device() else {
        return;
    };

    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
    let shaders = CompiledShaders::compile(&ShaderSet::in_dir(&dir)).unwrap();
    let binding = UniformBinding::new(&device);

    for depth in [Some(DEPTH_FORMAT), None] {
        let formats = TargetFormats {
            color: wgpu::TextureFormat::Rgba8Unorm,
            depth,
        };
        pollster::block_on(ShaderPipeline::build(
            &device,
            &shaders,
            formats,
            &binding.bind_group_layout,
        ))
        .unwrap();
    }
}

#[test]
fn depth_target_matches_requested_size() {
    let Some((device, _queue)) = headless_device() else {
        return;
    };

    let targets = FrameTargets::new(&device, 800, 400, true);
    let depth = targets.depth.as_ref().unwrap();
    assert_eq!(depth.texture.width(), 800);
    assert_eq!(depth.texture.height(), 400);
    assert_eq!(depth.texture.format(), DEPTH_FORMAT);
    assert_eq!(targets.depth_format(), Some(DEPTH_FORMAT));

    let flat = FrameTargets::new(&device, 800, 400, false);
    assert!(flat.depth.is_none());
}
