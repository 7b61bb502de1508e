//! Flat annulus generation for planetary rings.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::mesh::{Mesh, Vertex};

/// Generate a flat ring in the XZ plane with every normal pointing at +Y.
///
/// For each step `i` in `0..=segments` an inner and an outer vertex are
/// emitted (interleaved, inner first), giving `2 * (segments + 1)` vertices.
/// Inner vertices carry uv `(0, 0)` and outer vertices `(1, 1)`, so a ring
/// texture is sampled radially along its diagonal.
///
/// Zero segments yields an empty mesh.
pub fn generate_ring(inner_radius: f32, outer_radius: f32, segments: u32) -> Mesh {
    if segments == 0 {
        return Mesh::empty();
    }

    let mut vertices = Vec::with_capacity(2 * (segments as usize + 1));
    for i in 0..=segments {
        let theta = i as f32 * TAU / segments as f32;
        let (sin, cos) = theta.sin_cos();
        let direction = Vec3::new(cos, 0.0, sin);

        vertices.push(Vertex::new(direction * inner_radius, Vec3::Y, [0.0, 0.0]));
        vertices.push(Vertex::new(direction * outer_radius, Vec3::Y, [1.0, 1.0]));
    }

    let mut indices = Vec::with_capacity(6 * segments as usize);
    for i in 0..segments {
        let inner = 2 * i;
        let outer = inner + 1;
        let next_inner = 2 * (i + 1);
        let next_outer = next_inner + 1;

        indices.extend_from_slice(&[inner, outer, next_inner]);
        indices.extend_from_slice(&[next_inner, outer, next_outer]);
    }

    Mesh { vertices, indices }
}
