//! Full-screen quad for the starfield backdrop.

/// A 2D clip-space vertex with texture coordinates.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BackgroundVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(BackgroundVertex, [u8; 16]);

const fn bg(x: f32, y: f32, u: f32, v: f32) -> BackgroundVertex {
    BackgroundVertex {
        position: [x, y],
        uv: [u, v],
    }
}

/// Two triangles covering clip space `[-1, 1]²`, drawn without an index buffer.
///
/// uv `(0, 0)` sits at the bottom-left corner and `(1, 1)` at the top-right.
pub const BACKGROUND_QUAD: [BackgroundVertex; 6] = [
    bg(-1.0, 1.0, 0.0, 1.0),
    bg(-1.0, -1.0, 0.0, 0.0),
    bg(1.0, -1.0, 1.0, 0.0),
    bg(-1.0, 1.0, 0.0, 1.0),
    bg(1.0, -1.0, 1.0, 0.0),
    bg(1.0, 1.0, 1.0, 1.0),
];

/// The background quad vertices.
pub fn background_quad() -> [BackgroundVertex; 6] {
    BACKGROUND_QUAD
}
