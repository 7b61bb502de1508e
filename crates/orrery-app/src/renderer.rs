//! GPU resources for the solar system and the per-frame draw.

use std::sync::Arc;

use glam::Vec3;
use orrery_camera::Camera;
use orrery_config::Config;
use orrery_mesh::{generate_ring, generate_sphere};
use orrery_render::{
    Backdrop, DepthBuffer, FrameEncoder, LIGHT_COUNT, RenderContext, RenderPassBuilder,
    Renderable, ScenePipelines, ShaderProgram, SurfaceError, Texture, TextureLoader, UniformBuffer,
    init_render_context_blocking, write_object_uniforms, write_scene_uniforms,
};
use tracing::{info, warn};
use winit::window::Window;

use crate::error::AppError;
use crate::solar::{BodyTransform, SolarSystem};

/// A renderable with its textures and object uniform buffers.
struct DrawItem {
    renderable: Renderable,
    texture: Arc<Texture>,
    uniforms: UniformBuffer,
    ring: Option<(Arc<Texture>, UniformBuffer)>,
}

impl DrawItem {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, program: &ShaderProgram) {
        pass.set_bind_group(1, &self.texture.bind_group, &[]);
        pass.set_bind_group(2, self.uniforms.bind_group(), &[]);
        self.renderable.draw(pass, program);
    }

    fn draw_ring(&self, pass: &mut wgpu::RenderPass<'_>, program: &ShaderProgram) {
        if let Some((texture, uniforms)) = &self.ring {
            pass.set_bind_group(1, &texture.bind_group, &[]);
            pass.set_bind_group(2, uniforms.bind_group(), &[]);
            self.renderable.draw_ring(pass, program);
        }
    }
}

/// Per-frame camera inputs.
pub struct FrameView<'a> {
    pub camera: &'a Camera,
    pub time: f32,
}

pub struct Renderer {
    ctx: RenderContext,
    depth: DepthBuffer,
    pipelines: ScenePipelines,
    backdrop: Backdrop,
    scene_uniforms: UniformBuffer,
    sun: DrawItem,
    bodies: Vec<DrawItem>,
    lights: [Vec3; LIGHT_COUNT],
    near: f32,
    far: f32,
}

impl Renderer {
    /// Bring up the GPU and load every mesh, texture and program. Any missing
    /// asset is an error.
    pub fn new(window: Arc<Window>, config: &Config) -> Result<Self, AppError> {
        let ctx = init_render_context_blocking(window, config.window.vsync)?;
        let device = &ctx.device;
        let queue = &ctx.queue;
        let (width, height) = ctx.size();

        let mut textures = TextureLoader::new(device);
        let pipelines = ScenePipelines::new(
            device,
            ctx.surface_format,
            textures.bind_group_layout(),
            config.assets.shader_dir.as_deref(),
        )?;
        let depth = DepthBuffer::new(device, width, height);

        let scene = &config.scene;
        let background =
            textures.from_path(device, queue, &config.asset_path(&scene.background_texture))?;
        let backdrop = Backdrop::new(device, background);

        let sphere = generate_sphere(
            1.0,
            scene.sphere_longitude_segments,
            scene.sphere_latitude_segments,
        );

        let sun = DrawItem {
            renderable: Renderable::new(device, "sun", sphere.clone()),
            texture: textures.from_path(device, queue, &config.asset_path(&scene.sun.texture))?,
            uniforms: pipelines.object_uniforms(device, "sun"),
            ring: None,
        };

        let mut bodies = Vec::with_capacity(scene.bodies.len());
        for body in &scene.bodies {
            let mut renderable = Renderable::new(device, &body.name, sphere.clone());
            let mut ring = None;
            if let Some(ring_config) = &body.ring {
                renderable = renderable.with_ring(
                    device,
                    generate_ring(
                        ring_config.inner_radius,
                        ring_config.outer_radius,
                        ring_config.segments,
                    ),
                );
                ring = Some((
                    textures.from_path(device, queue, &config.asset_path(&ring_config.texture))?,
                    pipelines.object_uniforms(device, &format!("{}-ring", body.name)),
                ));
            }

            bodies.push(DrawItem {
                renderable,
                texture: textures.from_path(device, queue, &config.asset_path(&body.texture))?,
                uniforms: pipelines.object_uniforms(device, &body.name),
                ring,
            });
        }

        info!(
            bodies = bodies.len(),
            textures = textures.cached_count(),
            "Scene resources ready"
        );

        let scene_uniforms = pipelines.scene_uniforms(device);
        let lights = config
            .lighting
            .fixed::<LIGHT_COUNT>()
            .map(Vec3::from_array);

        Ok(Self {
            depth,
            pipelines,
            backdrop,
            scene_uniforms,
            sun,
            bodies,
            lights,
            near: config.camera.near,
            far: config.camera.far,
            ctx,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
        let (width, height) = self.ctx.size();
        self.depth.resize(&self.ctx.device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.ctx.size()
    }

    /// Draw one frame: background, sun, bodies, then rings.
    ///
    /// A timed-out or lost surface skips the frame.
    pub fn render(&mut self, view: &FrameView<'_>, system: &SolarSystem) -> Result<(), AppError> {
        let frame = match self.ctx.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
                return Ok(());
            }
            Err(SurfaceError::Lost) => {
                let (width, height) = self.ctx.size();
                self.resize(width, height);
                return Ok(());
            }
            Err(SurfaceError::OutOfMemory) => return Err(AppError::OutOfMemory),
        };

        self.update_uniforms(view, system)?;

        let mut encoder = FrameEncoder::new(&self.ctx.device, &self.ctx.queue, frame);
        {
            let builder = RenderPassBuilder::new()
                .depth(&self.depth)
                .label("orrery-scene");
            let mut pass = encoder.begin_render_pass(&builder);

            self.backdrop.draw(&mut pass, &self.pipelines.background);

            pass.set_bind_group(0, self.scene_uniforms.bind_group(), &[]);
            self.sun.draw(&mut pass, &self.pipelines.body);
            for body in &self.bodies {
                body.draw(&mut pass, &self.pipelines.body);
            }
            for body in &self.bodies {
                body.draw_ring(&mut pass, &self.pipelines.ring);
            }
        }
        encoder.submit();
        Ok(())
    }

    fn update_uniforms(
        &mut self,
        view: &FrameView<'_>,
        system: &SolarSystem,
    ) -> Result<(), AppError> {
        let queue = &self.ctx.queue;
        let camera = view.camera;
        let projection = camera.projection_matrix(self.ctx.aspect_ratio(), self.near, self.far);

        write_scene_uniforms(
            self.scene_uniforms.block_mut(),
            projection,
            camera.view_matrix(),
            camera.position(),
            &self.lights,
        )?;
        self.scene_uniforms.upload(queue);

        write_object_uniforms(self.sun.uniforms.block_mut(), system.sun_transform(), true)?;
        self.sun.uniforms.upload(queue);

        let transforms = system.body_transforms(view.time);
        for (item, transform) in self.bodies.iter_mut().zip(&transforms) {
            upload_body(queue, item, transform)?;
        }
        Ok(())
    }
}

fn upload_body(
    queue: &wgpu::Queue,
    item: &mut DrawItem,
    transform: &BodyTransform,
) -> Result<(), AppError> {
    write_object_uniforms(item.uniforms.block_mut(), transform.model, false)?;
    item.uniforms.upload(queue);

    if let (Some((_, uniforms)), Some(model)) = (&mut item.ring, transform.ring) {
        write_object_uniforms(uniforms.block_mut(), model, false)?;
        uniforms.upload(queue);
    }
    Ok(())
}
