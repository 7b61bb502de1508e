//! UV-sphere generation.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::mesh::{Mesh, Vertex};

/// Generate a UV-parameterized sphere centred on the origin.
///
/// Vertices are emitted row by row, latitude in the outer loop (from the
/// +Y pole down to the -Y pole) and longitude in the inner loop, giving
/// `(longitude_segments + 1) * (latitude_segments + 1)` vertices. The seam
/// column is duplicated so texture coordinates run the full `[0, 1]` range.
///
/// Each quad cell `(x, y)` contributes the triangles `(i1, i2, i1 + 1)` and
/// `(i1 + 1, i2, i2 + 1)` where `i1 = y * (longitude_segments + 1) + x` and
/// `i2 = i1 + longitude_segments + 1`.
///
/// Normals are `position / radius`, so they stay unit length for any radius.
/// A segment count of zero on either axis yields an empty mesh.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> Mesh {
    if longitude_segments == 0 || latitude_segments == 0 {
        return Mesh::empty();
    }

    let columns = longitude_segments + 1;
    let rows = latitude_segments + 1;

    let mut vertices = Vec::with_capacity((columns * rows) as usize);
    for y in 0..rows {
        let v = y as f32 / latitude_segments as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();

        for x in 0..columns {
            let u = x as f32 / longitude_segments as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();

            let direction = Vec3::new(cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            vertices.push(Vertex::new(direction * radius, direction, [u, v]));
        }
    }

    let mut indices = Vec::with_capacity((longitude_segments * latitude_segments * 6) as usize);
    for y in 0..latitude_segments {
        for x in 0..longitude_segments {
            let i1 = y * columns + x;
            let i2 = i1 + columns;

            indices.extend_from_slice(&[i1, i2, i1 + 1]);
            indices.extend_from_slice(&[i1 + 1, i2, i2 + 1]);
        }
    }

    Mesh { vertices, indices }
}
