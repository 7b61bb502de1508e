//! Procedural geometry for the orrery: UV-spheres, flat rings and the
//! full-screen background quad.
//!
//! Every generator is a pure function. Meshes are built once at startup and
//! handed to the renderer for upload; nothing here touches the GPU.

pub mod mesh;
pub mod quad;
pub mod ring;
pub mod sphere;

pub use mesh::{Mesh, Vertex};
pub use quad::{BackgroundVertex, background_quad};
pub use ring::generate_ring;
pub use sphere::generate_sphere;
