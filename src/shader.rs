//! # Shader Pipeline
//!
//! Turns the two WGSL assets into a bind-ready render pipeline in two phases.
//!
//! ## Compile (CPU only)
//!
//! [`compile`] reads one asset from disk and runs it through the `naga` WGSL front end and the
//! validator with every validation flag enabled. It then checks that the requested entry point
//! exists and belongs to the requested stage. Any failure produces the rendered diagnostic report,
//! logs it, and returns [`RendererError::ShaderCompileFailed`]. There is no fallback shader.
//!
//! [`CompiledShaders::compile`] does this for both stages and then reflects the vertex entry
//! point's `@location` inputs against [`Vertex::ATTRIBUTES`], so a disagreement between the input
//! layout and the shader signature is reported as [`RendererError::LayoutMismatch`] before any
//! GPU object exists.
//!
//! ## Build (GPU)
//!
//! [`ShaderPipeline::build`] creates the shader modules and the render pipeline inside error
//! scopes: clockwise front faces, back-face culling, triangle lists, one opaque color target and an
//! optional depth/stencil target.

use std::fmt;
use std::path::{Path, PathBuf};

use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::config::{ShaderAsset, ShaderSet};
use crate::error::{RendererError, Result};
use crate::gpu::capture_errors;
use crate::vertex::Vertex;

/// Pipeline stage a shader entry point is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn matches(self, stage: naga::ShaderStage) -> bool {
        matches!(
            (self, stage),
            (ShaderStage::Vertex, naga::ShaderStage::Vertex)
                | (ShaderStage::Fragment, naga::ShaderStage::Fragment)
        )
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// A parsed and validated shader stage, ready to be turned into a GPU module.
#[derive(Debug)]
pub struct CompiledShader {
    pub path: PathBuf,
    pub entry_point: String,
    pub stage: ShaderStage,
    source: String,
    module: naga::Module,
}

impl CompiledShader {
    pub fn source(&self) -> &str {
        &self.source
    }

    fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point)
    }

    /// `(location, type)` for every `@location` input of the entry point, in declaration order.
    fn location_inputs(&self) -> Vec<(u32, &naga::TypeInner)> {
        let Some(entry) = self.entry() else {
            return Vec::new();
        };

        let mut inputs = Vec::new();
        for argument in &entry.function.arguments {
            match &argument.binding {
                Some(naga::Binding::Location { location, .. }) => {
                    inputs.push((*location, &self.module.types[argument.ty].inner));
                }
                Some(naga::Binding::BuiltIn(_)) => {}
                None => {
                    if let naga::TypeInner::Struct { members, .. } =
                        &self.module.types[argument.ty].inner
                    {
                        for member in members {
                            if let Some(naga::Binding::Location { location, .. }) = member.binding {
                                inputs.push((location, &self.module.types[member.ty].inner));
                            }
                        }
                    }
                }
            }
        }
        inputs
    }
}

/// Reads and compiles one shader asset.
pub fn compile(asset: &ShaderAsset) -> Result<CompiledShader> {
    let source =
        std::fs::read_to_string(&asset.path).map_err(|source| RendererError::ShaderSourceUnreadable {
            path: asset.path.clone(),
            source,
        })?;
    compile_source(&asset.path, source, &asset.entry_point, asset.stage)
}

/// Compiles WGSL text that has already been loaded. `path` only labels diagnostics.
pub fn compile_source(
    path: &Path,
    source: String,
    entry_point: &str,
    stage: ShaderStage,
) -> Result<CompiledShader> {
    let failed = |diagnostics: String| {
        log::error!("Shader {} failed to compile:\n{diagnostics}", path.display());
        RendererError::ShaderCompileFailed {
            path: path.to_path_buf(),
            diagnostics,
        }
    };

    let module = naga::front::wgsl::parse_str(&source)
        .map_err(|err| failed(err.emit_to_string(&source)))?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| failed(err.emit_to_string(&source)))?;

    let shader = CompiledShader {
        path: path.to_path_buf(),
        entry_point: entry_point.to_owned(),
        stage,
        source,
        module,
    };

    let problem = match shader.entry() {
        None => {
            let available: Vec<&str> = shader
                .module
                .entry_points
                .iter()
                .map(|ep| ep.name.as_str())
                .collect();
            Some(format!(
                "entry point `{entry_point}` not found (available: {available:?})"
            ))
        }
        Some(ep) if !stage.matches(ep.stage) => Some(format!(
            "entry point `{entry_point}` is a {:?} entry point, expected {stage}",
            ep.stage
        )),
        Some(_) => None,
    };
    if let Some(diagnostics) = problem {
        return Err(failed(diagnostics));
    }

    log::debug!("Compiled {stage} shader {} (`{entry_point}`)", path.display());
    Ok(shader)
}

/// Scalar kind and component count a vertex format presents to the shader.
fn format_signature(format: wgpu::VertexFormat) -> Option<(naga::ScalarKind, u32)> {
    use naga::ScalarKind::{Float, Sint, Uint};
    use wgpu::VertexFormat as F;

    Some(match format {
        F::Float32 => (Float, 1),
        F::Float32x2 => (Float, 2),
        F::Float32x3 => (Float, 3),
        F::Float32x4 => (Float, 4),
        F::Uint32 => (Uint, 1),
        F::Uint32x2 => (Uint, 2),
        F::Uint32x3 => (Uint, 3),
        F::Uint32x4 => (Uint, 4),
        F::Sint32 => (Sint, 1),
        F::Sint32x2 => (Sint, 2),
        F::Sint32x3 => (Sint, 3),
        F::Sint32x4 => (Sint, 4),
        _ => return None,
    })
}

fn type_signature(ty: &naga::TypeInner) -> Option<(naga::ScalarKind, u32)> {
    match *ty {
        naga::TypeInner::Scalar(scalar) => Some((scalar.kind, 1)),
        naga::TypeInner::Vector { size, scalar } => Some((scalar.kind, size as u32)),
        _ => None,
    }
}

/// Checks that every `@location` the vertex entry point reads is supplied by `attributes` with a
/// matching scalar kind and component count.
pub fn check_vertex_layout(
    shader: &CompiledShader,
    attributes: &[wgpu::VertexAttribute],
) -> Result<()> {
    let mismatch = |reason: String| RendererError::LayoutMismatch {
        entry_point: shader.entry_point.clone(),
        reason,
    };

    let inputs = shader.location_inputs();
    for (location, ty) in &inputs {
        let attribute = attributes
            .iter()
            .find(|a| a.shader_location == *location)
            .ok_or_else(|| mismatch(format!("@location({location}) has no vertex attribute")))?;

        let provided = format_signature(attribute.format).ok_or_else(|| {
            mismatch(format!(
                "@location({location}) uses unsupported format {:?}",
                attribute.format
            ))
        })?;
        let expected = type_signature(ty)
            .ok_or_else(|| mismatch(format!("@location({location}) is not a scalar or vector")))?;

        if provided != expected {
            return Err(mismatch(format!(
                "@location({location}) expects {expected:?} but the layout provides {:?} ({provided:?})",
                attribute.format
            )));
        }
    }

    for attribute in attributes {
        if !inputs.iter().any(|(loc, _)| *loc == attribute.shader_location) {
            log::warn!(
                "Vertex attribute @location({}) is not read by `{}`",
                attribute.shader_location,
                shader.entry_point
            );
        }
    }
    Ok(())
}

/// Both stages of the scene pipeline, compiled and checked against the vertex layout.
#[derive(Debug)]
pub struct CompiledShaders {
    pub vertex: CompiledShader,
    pub fragment: CompiledShader,
}

impl CompiledShaders {
    pub fn compile(set: &ShaderSet) -> Result<Self> {
        let vertex = compile(&set.vertex)?;
        let fragment = compile(&set.fragment)?;
        check_vertex_layout(&vertex, &Vertex::ATTRIBUTES)?;
        Ok(Self { vertex, fragment })
    }
}

/// Render targets the pipeline must be compatible with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetFormats {
    pub color: wgpu::TextureFormat,
    pub depth: Option<wgpu::TextureFormat>,
}

/// The scene's render pipeline.
pub struct ShaderPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl ShaderPipeline {
    /// Creates the GPU shader modules and the render pipeline.
    ///
    /// # Errors
    ///
    /// [`RendererError::ResourceAllocationFailed`] if the device rejects a module or the pipeline,
    /// for example when the vertex outputs do not feed the fragment inputs.
    pub async fn build(
        device: &wgpu::Device,
        shaders: &CompiledShaders,
        formats: TargetFormats,
        uniform_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self> {
        let vertex_module = capture_errors(device, "vertex shader module", |device| {
            create_module(device, &shaders.vertex)
        })
        .await?;
        let fragment_module = capture_errors(device, "fragment shader module", |device| {
            create_module(device, &shaders.fragment)
        })
        .await?;

        let pipeline = capture_errors(device, "scene render pipeline", |device| {
            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[uniform_layout],
                push_constant_ranges: &[],
            });

            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &vertex_module,
                    entry_point: Some(&shaders.vertex.entry_point),
                    buffers: &[Vertex::description()],
                    compilation_options: Default::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    conservative: false,
                    unclipped_depth: false,
                },
                depth_stencil: formats.depth.map(|format| wgpu::DepthStencilState {
                    format,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some(&shaders.fragment.entry_point),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: formats.color,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                multiview: None,
                cache: None,
            })
        })
        .await?;

        log::info!(
            "Built scene pipeline from {} and {}",
            shaders.vertex.path.display(),
            shaders.fragment.path.display()
        );
        Ok(Self { pipeline })
    }
}

fn create_module(device: &wgpu::Device, shader: &CompiledShader) -> wgpu::ShaderModule {
    let label = shader.path.display().to_string();
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(shader.source())),
    })
}
