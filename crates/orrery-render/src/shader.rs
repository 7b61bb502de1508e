//! Shader programs: a WGSL vertex stage and fragment stage linked into one
//! render pipeline.
//!
//! Sources are validated with naga before wgpu sees them, so a broken shader
//! file becomes a [`ShaderError`] with the compiler diagnostic instead of a
//! device error.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

/// Entry point every vertex module must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment module must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("shader '{name}' failed to parse:\n{message}")]
    Parse { name: String, message: String },

    #[error("shader '{name}' failed validation:\n{message}")]
    Validation { name: String, message: String },

    #[error("shader '{name}' has no {stage} entry point '{entry_point}'")]
    MissingEntryPoint {
        name: String,
        stage: &'static str,
        entry_point: &'static str,
    },
}

/// Where a stage's WGSL comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderSource {
    /// Compiled into the binary.
    Embedded {
        name: &'static str,
        code: &'static str,
    },
    /// Read from disk when the program is built.
    File(PathBuf),
}

impl ShaderSource {
    /// `dir/file_name` when a shader directory is configured, otherwise the
    /// embedded fallback.
    pub fn resolve(shader_dir: Option<&Path>, file_name: &'static str, code: &'static str) -> Self {
        match shader_dir {
            Some(dir) => Self::File(dir.join(file_name)),
            None => Self::Embedded {
                name: file_name,
                code,
            },
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Embedded { name, .. } => (*name).to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    pub fn load(&self) -> Result<Cow<'static, str>, ShaderError> {
        match self {
            Self::Embedded { code, .. } => Ok(Cow::Borrowed(code)),
            Self::File(path) => {
                debug!("Loading shader from file: {}", path.display());
                std::fs::read_to_string(path)
                    .map(Cow::Owned)
                    .map_err(|source| ShaderError::Io {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}

/// Everything needed to build a [`ShaderProgram`].
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    pub vertex: ShaderSource,
    pub fragment: ShaderSource,
    pub vertex_buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub color_format: wgpu::TextureFormat,
    pub blend: Option<wgpu::BlendState>,
    pub primitive: wgpu::PrimitiveState,
    pub depth_stencil: Option<wgpu::DepthStencilState>,
}

/// A validated, linked vertex + fragment program.
pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
}

impl ShaderProgram {
    /// Load, validate and link both stages, then build the pipeline.
    pub fn new(device: &wgpu::Device, desc: &ProgramDescriptor<'_>) -> Result<Self, ShaderError> {
        let vertex_name = desc.vertex.name();
        let fragment_name = desc.fragment.name();
        let vertex_code = desc.vertex.load()?;
        let fragment_code = desc.fragment.load()?;

        validate_wgsl(&vertex_name, &vertex_code, naga::ShaderStage::Vertex, VERTEX_ENTRY)?;
        validate_wgsl(
            &fragment_name,
            &fragment_code,
            naga::ShaderStage::Fragment,
            FRAGMENT_ENTRY,
        )?;

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&vertex_name),
            source: wgpu::ShaderSource::Wgsl(vertex_code.as_ref().into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&fragment_name),
            source: wgpu::ShaderSource::Wgsl(fragment_code.as_ref().into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{}-layout", desc.label)),
            bind_group_layouts: desc.bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some(VERTEX_ENTRY),
                buffers: desc.vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: desc.primitive,
            depth_stencil: desc.depth_stencil.clone(),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.color_format,
                    blend: desc.blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        info!(
            "Linked shader program '{}' ({vertex_name} + {fragment_name})",
            desc.label
        );
        Ok(Self {
            label: desc.label.to_string(),
            pipeline,
        })
    }

    /// Make this program current for subsequent draws in `pass`.
    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }
}

/// Parse and validate `source`, and check it exports `entry_point` for
/// `stage`.
pub fn validate_wgsl(
    name: &str,
    source: &str,
    stage: naga::ShaderStage,
    entry_point: &'static str,
) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|err| ShaderError::Parse {
        name: name.to_string(),
        message: err.emit_to_string(source),
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|err| ShaderError::Validation {
        name: name.to_string(),
        message: err.as_inner().to_string(),
    })?;

    let exported = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == stage && ep.name == entry_point);
    if !exported {
        return Err(ShaderError::MissingEntryPoint {
            name: name.to_string(),
            stage: stage_name(stage),
            entry_point,
        });
    }

    debug!("Validated shader '{name}'");
    Ok(())
}

fn stage_name(stage: naga::ShaderStage) -> &'static str {
    match stage {
        naga::ShaderStage::Vertex => "vertex",
        naga::ShaderStage::Fragment => "fragment",
        naga::ShaderStage::Compute => "compute",
        _ => "other",
    }
}
