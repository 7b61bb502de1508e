//! Vertex and index buffers for the CPU meshes.

use std::mem::{offset_of, size_of};

use orrery_mesh::{BackgroundVertex, Mesh, Vertex};
use wgpu::util::DeviceExt;

/// A mesh uploaded to the GPU: one vertex buffer and a `u32` index buffer.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    /// Bind vertex slot 0 and the index buffer.
    pub fn bind(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates GPU buffers on a device.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload `mesh`. Returns `None` for an empty mesh, which has nothing to
    /// draw and would need zero-sized buffers.
    pub fn create_mesh(&self, label: &str, mesh: &Mesh) -> Option<MeshBuffer> {
        if mesh.is_empty() {
            log::debug!("Skipping upload of empty mesh '{label}'");
            return None;
        }
        Some(MeshBuffer {
            vertex_buffer: self
                .create_vertex_buffer(&format!("{label}-vertices"), mesh.vertex_bytes()),
            index_buffer: self.create_index_buffer(&format!("{label}-indices"), &mesh.indices),
            index_count: mesh.indices.len() as u32,
        })
    }

    pub fn create_vertex_buffer(&self, label: &str, data: &[u8]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    pub fn create_index_buffer(&self, label: &str, data: &[u32]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(data),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    wgpu::VertexAttribute {
        offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x3,
    },
    wgpu::VertexAttribute {
        offset: offset_of!(Vertex, uv) as wgpu::BufferAddress,
        shader_location: 2,
        format: wgpu::VertexFormat::Float32x2,
    },
];

const BACKGROUND_ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
    wgpu::VertexAttribute {
        offset: offset_of!(BackgroundVertex, position) as wgpu::BufferAddress,
        shader_location: 0,
        format: wgpu::VertexFormat::Float32x2,
    },
    wgpu::VertexAttribute {
        offset: offset_of!(BackgroundVertex, uv) as wgpu::BufferAddress,
        shader_location: 1,
        format: wgpu::VertexFormat::Float32x2,
    },
];

/// Layout of [`Vertex`]: position at location 0, normal at 1, uv at 2.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Layout of [`BackgroundVertex`]: position at location 0, uv at 1.
pub fn background_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<BackgroundVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &BACKGROUND_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_device;
    use orrery_mesh::{generate_ring, generate_sphere};

    #[test]
    fn test_vertex_layout_matches_struct() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
        let locations: Vec<_> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2]);
    }

    #[test]
    fn test_background_layout_matches_struct() {
        let layout = background_vertex_layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn test_sphere_upload() {
        let Some((device, _queue)) = test_device() else {
            return;
        };
        let mesh = generate_sphere(1.0, 36, 18);
        let buffer = BufferAllocator::new(&device)
            .create_mesh("sphere", &mesh)
            .unwrap();
        assert_eq!(buffer.index_count as usize, mesh.indices.len());
        assert_eq!(buffer.vertex_buffer.size(), (37 * 19 * 32) as u64);
    }

    #[test]
    fn test_ring_upload() {
        let Some((device, _queue)) = test_device() else {
            return;
        };
        let buffer = BufferAllocator::new(&device)
            .create_mesh("ring", &generate_ring(1.2, 2.0, 64))
            .unwrap();
        assert_eq!(buffer.index_count, 64 * 6);
    }

    #[test]
    fn test_empty_mesh_is_not_uploaded() {
        let Some((device, _queue)) = test_device() else {
            return;
        };
        assert!(
            BufferAllocator::new(&device)
                .create_mesh("empty", &Mesh::empty())
                .is_none()
        );
    }
}
