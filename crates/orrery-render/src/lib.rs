//! GPU side of the orrery: device setup, buffers, textures, shader programs,
//! uniform blocks, and the renderables drawn with them.

pub mod backdrop;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod renderable;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod uniform;

#[cfg(test)]
mod test_support;

pub use backdrop::Backdrop;
pub use buffer::{BufferAllocator, MeshBuffer, background_vertex_layout, vertex_layout};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLACK};
pub use renderable::Renderable;
pub use scene::{
    LIGHT_COUNT, SceneError, ScenePipelines, object_uniform_layout, scene_uniform_layout,
    write_object_uniforms, write_scene_uniforms,
};
pub use shader::{ProgramDescriptor, ShaderError, ShaderProgram, ShaderSource, validate_wgsl};
pub use texture::{Texture, TextureError, TextureLoader, decode_image};
pub use uniform::{
    UniformBlock, UniformBuffer, UniformError, UniformField, UniformLayout, UniformLayoutBuilder,
    UniformType, uniform_bind_group_layout,
};
