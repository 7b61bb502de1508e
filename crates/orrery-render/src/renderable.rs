//! A generated mesh together with the GPU buffers built from it.

use orrery_mesh::Mesh;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::shader::ShaderProgram;

/// A mesh plus its uploaded copy, `None` when the mesh is empty.
struct Part {
    mesh: Mesh,
    buffer: Option<MeshBuffer>,
}

impl Part {
    fn upload(device: &wgpu::Device, label: &str, mesh: Mesh) -> Self {
        let buffer = BufferAllocator::new(device).create_mesh(label, &mesh);
        Self { mesh, buffer }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>, program: &ShaderProgram) {
        if let Some(buffer) = &self.buffer {
            program.use_program(pass);
            buffer.bind(pass);
            buffer.draw(pass);
        }
    }
}

/// One drawable entity: a body mesh and, for ringed planets, a ring mesh.
///
/// Buffers are written once here and only read by draws afterwards. Bind
/// groups (uniforms, textures) are the caller's business.
pub struct Renderable {
    label: String,
    body: Part,
    ring: Option<Part>,
}

impl Renderable {
    pub fn new(device: &wgpu::Device, label: &str, mesh: Mesh) -> Self {
        log::debug!(
            "Renderable '{label}': {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Self {
            label: label.to_string(),
            body: Part::upload(device, label, mesh),
            ring: None,
        }
    }

    /// Attach a second mesh drawn through [`draw_ring`](Self::draw_ring).
    pub fn with_ring(mut self, device: &wgpu::Device, ring: Mesh) -> Self {
        self.ring = Some(Part::upload(device, &format!("{}-ring", self.label), ring));
        self
    }

    /// Draw the body mesh with `program`. Empty meshes draw nothing.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, program: &ShaderProgram) {
        self.body.draw(pass, program);
    }

    /// Draw the ring mesh with `program`; a no-op without a ring.
    pub fn draw_ring(&self, pass: &mut wgpu::RenderPass<'_>, program: &ShaderProgram) {
        if let Some(ring) = &self.ring {
            ring.draw(pass, program);
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mesh(&self) -> &Mesh {
        &self.body.mesh
    }

    pub fn ring(&self) -> Option<&Mesh> {
        self.ring.as_ref().map(|ring| &ring.mesh)
    }

    pub fn has_ring(&self) -> bool {
        self.ring.is_some()
    }

    /// Whether the body mesh made it to the GPU.
    pub fn is_uploaded(&self) -> bool {
        self.body.buffer.is_some()
    }
}
