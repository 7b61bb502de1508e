//! The textured quad behind everything else.

use std::sync::Arc;

use orrery_mesh::{BackgroundVertex, background_quad};

use crate::buffer::BufferAllocator;
use crate::shader::ShaderProgram;
use crate::texture::Texture;

/// Background quad vertices and the texture stretched over them.
pub struct Backdrop {
    vertices: wgpu::Buffer,
    vertex_count: u32,
    texture: Arc<Texture>,
}

impl Backdrop {
    pub fn new(device: &wgpu::Device, texture: Arc<Texture>) -> Self {
        let quad: [BackgroundVertex; 6] = background_quad();
        let vertices = BufferAllocator::new(device)
            .create_vertex_buffer("background-quad", bytemuck::cast_slice(&quad));
        Self {
            vertices,
            vertex_count: quad.len() as u32,
            texture,
        }
    }

    /// Draw with the background program. Must come first in the pass: it
    /// neither tests nor writes depth.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, program: &ShaderProgram) {
        program.use_program(pass);
        pass.set_bind_group(0, &self.texture.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureLoader;

    #[test]
    fn test_quad_upload() {
        let Some((device, queue)) = crate::test_support::test_device() else {
            return;
        };
        let loader = TextureLoader::new(&device);
        let texture = loader
            .from_rgba(&device, &queue, "stars", &[0; 4 * 8 * 8], 8, 8)
            .unwrap();
        let backdrop = Backdrop::new(&device, Arc::new(texture));
        assert_eq!(backdrop.vertex_count, 6);
        assert_eq!(backdrop.vertices.size(), 6 * 16);
        assert_eq!(backdrop.texture().dimensions, (8, 8));
    }
}
