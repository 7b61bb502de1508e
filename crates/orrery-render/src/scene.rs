//! The three programs the solar system is drawn with and the uniform
//! blocks that feed them.
//!
//! Bind groups for body and ring programs:
//!   - group 0: scene uniforms (`projection`, `view`, `view_pos`, `light_pos[6]`)
//!   - group 1: body texture + sampler
//!   - group 2: object uniforms (`model`, `is_sun`)
//!
//! The background program binds only its texture, at group 0.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::buffer::{background_vertex_layout, vertex_layout};
use crate::depth::DepthBuffer;
use crate::shader::{ProgramDescriptor, ShaderError, ShaderProgram, ShaderSource};
use crate::uniform::{
    UniformBlock, UniformBuffer, UniformError, UniformLayout, UniformType,
    uniform_bind_group_layout,
};

/// Point lights in the scene block.
pub const LIGHT_COUNT: usize = 6;

pub const BODY_VERT_WGSL: &str = include_str!("../shaders/body.vert.wgsl");
pub const BODY_FRAG_WGSL: &str = include_str!("../shaders/body.frag.wgsl");
pub const BACKGROUND_VERT_WGSL: &str = include_str!("../shaders/background.vert.wgsl");
pub const BACKGROUND_FRAG_WGSL: &str = include_str!("../shaders/background.frag.wgsl");

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Uniform(#[from] UniformError),
}

/// Layout of the per-frame scene block.
pub fn scene_uniform_layout() -> Result<UniformLayout, UniformError> {
    UniformLayout::builder()
        .field("projection", UniformType::Mat4)
        .field("view", UniformType::Mat4)
        .field("view_pos", UniformType::Vec3)
        .array("light_pos", UniformType::Vec3, LIGHT_COUNT as u32)
        .build()
}

/// Layout of the per-object block.
pub fn object_uniform_layout() -> Result<UniformLayout, UniformError> {
    UniformLayout::builder()
        .field("model", UniformType::Mat4)
        .field("is_sun", UniformType::Bool)
        .build()
}

/// Fill a scene block for one frame.
pub fn write_scene_uniforms(
    block: &mut UniformBlock,
    projection: Mat4,
    view: Mat4,
    view_pos: Vec3,
    lights: &[Vec3; LIGHT_COUNT],
) -> Result<(), UniformError> {
    block.set_mat4("projection", projection)?;
    block.set_mat4("view", view)?;
    block.set_vec3("view_pos", view_pos)?;
    for (i, light) in lights.iter().enumerate() {
        block.set_vec3(&format!("light_pos[{i}]"), *light)?;
    }
    Ok(())
}

pub fn write_object_uniforms(
    block: &mut UniformBlock,
    model: Mat4,
    is_sun: bool,
) -> Result<(), UniformError> {
    block.set_mat4("model", model)?;
    block.set_bool("is_sun", is_sun)
}

/// Compiled programs plus the layouts their uniform buffers are created from.
pub struct ScenePipelines {
    pub body: ShaderProgram,
    pub ring: ShaderProgram,
    pub background: ShaderProgram,
    scene_layout: Arc<UniformLayout>,
    object_layout: Arc<UniformLayout>,
    scene_bind_group_layout: wgpu::BindGroupLayout,
    object_bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePipelines {
    /// Build every program. With `shader_dir` set, stages are read from
    /// `<dir>/body.vert.wgsl` and friends instead of the embedded copies.
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
        shader_dir: Option<&Path>,
    ) -> Result<Self, SceneError> {
        let scene_layout = Arc::new(scene_uniform_layout()?);
        let object_layout = Arc::new(object_uniform_layout()?);
        let stages = wgpu::ShaderStages::VERTEX_FRAGMENT;
        let scene_bind_group_layout = uniform_bind_group_layout(device, "scene-uniforms", stages);
        let object_bind_group_layout = uniform_bind_group_layout(device, "object-uniforms", stages);

        let body_groups = [
            &scene_bind_group_layout,
            texture_layout,
            &object_bind_group_layout,
        ];
        let body_buffers = [vertex_layout()];
        let body_vert = ShaderSource::resolve(shader_dir, "body.vert.wgsl", BODY_VERT_WGSL);
        let body_frag = ShaderSource::resolve(shader_dir, "body.frag.wgsl", BODY_FRAG_WGSL);

        let body = ShaderProgram::new(
            device,
            &ProgramDescriptor {
                label: "body",
                vertex: body_vert.clone(),
                fragment: body_frag.clone(),
                vertex_buffers: &body_buffers,
                bind_group_layouts: &body_groups,
                color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(DepthBuffer::state(true, DepthBuffer::COMPARE_FUNCTION)),
            },
        )?;

        // Rings are seen from both sides.
        let ring = ShaderProgram::new(
            device,
            &ProgramDescriptor {
                label: "ring",
                vertex: body_vert,
                fragment: body_frag,
                vertex_buffers: &body_buffers,
                bind_group_layouts: &body_groups,
                color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Cw,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(DepthBuffer::state(true, DepthBuffer::COMPARE_FUNCTION)),
            },
        )?;

        let background = ShaderProgram::new(
            device,
            &ProgramDescriptor {
                label: "background",
                vertex: ShaderSource::resolve(
                    shader_dir,
                    "background.vert.wgsl",
                    BACKGROUND_VERT_WGSL,
                ),
                fragment: ShaderSource::resolve(
                    shader_dir,
                    "background.frag.wgsl",
                    BACKGROUND_FRAG_WGSL,
                ),
                vertex_buffers: &[background_vertex_layout()],
                bind_group_layouts: &[texture_layout],
                color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: Some(DepthBuffer::state(false, wgpu::CompareFunction::Always)),
            },
        )?;

        Ok(Self {
            body,
            ring,
            background,
            scene_layout,
            object_layout,
            scene_bind_group_layout,
            object_bind_group_layout,
        })
    }

    /// A fresh scene block bound at group 0.
    pub fn scene_uniforms(&self, device: &wgpu::Device) -> UniformBuffer {
        UniformBuffer::new(
            device,
            "scene-uniforms",
            Arc::clone(&self.scene_layout),
            &self.scene_bind_group_layout,
        )
    }

    /// A fresh object block bound at group 2. Each drawn object needs its
    /// own, since all uploads land before the frame's draws execute.
    pub fn object_uniforms(&self, device: &wgpu::Device, label: &str) -> UniformBuffer {
        UniformBuffer::new(
            device,
            &format!("{label}-uniforms"),
            Arc::clone(&self.object_layout),
            &self.object_bind_group_layout,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{FRAGMENT_ENTRY, VERTEX_ENTRY, validate_wgsl};

    fn f32_at(block: &UniformBlock, offset: usize) -> f32 {
        f32::from_ne_bytes(block.as_bytes()[offset..offset + 4].try_into().unwrap())
    }

    #[test]
    fn test_embedded_shaders_validate() {
        for (name, source, stage, entry) in [
            ("body.vert", BODY_VERT_WGSL, naga::ShaderStage::Vertex, VERTEX_ENTRY),
            ("body.frag", BODY_FRAG_WGSL, naga::ShaderStage::Fragment, FRAGMENT_ENTRY),
            ("background.vert", BACKGROUND_VERT_WGSL, naga::ShaderStage::Vertex, VERTEX_ENTRY),
            ("background.frag", BACKGROUND_FRAG_WGSL, naga::ShaderStage::Fragment, FRAGMENT_ENTRY),
        ] {
            if let Err(err) = validate_wgsl(name, source, stage, entry) {
                panic!("{err}");
            }
        }
    }

    #[test]
    fn test_layouts_match_wgsl_structs() {
        let scene = scene_uniform_layout().unwrap();
        assert_eq!(scene.size(), 240);
        assert_eq!(scene.field("light_pos").unwrap().offset, 144);
        assert_eq!(scene.field("light_pos").unwrap().len, Some(LIGHT_COUNT as u32));

        let object = object_uniform_layout().unwrap();
        assert_eq!(object.size(), 80);
        assert_eq!(object.field("is_sun").unwrap().offset, 64);
    }

    #[test]
    fn test_write_scene_uniforms() {
        let mut block = UniformBlock::new(Arc::new(scene_uniform_layout().unwrap()));
        let lights = [
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(-2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, -2.0),
        ];
        write_scene_uniforms(
            &mut block,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::new(0.0, 0.0, 3.0),
            &lights,
        )
        .unwrap();
        assert_eq!(f32_at(&block, 0), 1.0);
        assert_eq!(f32_at(&block, 128 + 8), 3.0);
        assert_eq!(f32_at(&block, 144 + 5 * 16 + 8), -2.0);
    }

    #[test]
    fn test_write_object_uniforms() {
        let mut block = UniformBlock::new(Arc::new(object_uniform_layout().unwrap()));
        write_object_uniforms(&mut block, Mat4::from_scale(Vec3::splat(2.0)), true).unwrap();
        assert_eq!(f32_at(&block, 0), 2.0);
        assert_eq!(&block.as_bytes()[64..68], &1u32.to_ne_bytes());
    }

    #[test]
    fn test_pipelines_build_on_device() {
        let Some((device, _queue)) = crate::test_support::test_device() else {
            return;
        };
        let textures = crate::texture::TextureLoader::new(&device);
        let pipelines = ScenePipelines::new(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            textures.bind_group_layout(),
            None,
        )
        .unwrap();
        assert_eq!(pipelines.ring.label(), "ring");
        let scene = pipelines.scene_uniforms(&device);
        assert_eq!(scene.block().layout().size(), 240);
    }

    #[test]
    fn test_missing_shader_dir_files_fail() {
        let Some((device, _queue)) = crate::test_support::test_device() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let textures = crate::texture::TextureLoader::new(&device);
        let result = ScenePipelines::new(
            &device,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            textures.bind_group_layout(),
            Some(dir.path()),
        );
        assert!(matches!(result, Err(SceneError::Shader(ShaderError::Io { .. }))));
    }
}
