//! Body transforms over time.

use glam::{Mat4, Vec3};
use orrery_config::{BodyConfig, SceneConfig};

/// Model matrices of one orbiting body at some instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub model: Mat4,
    /// Present for bodies with a ring. It follows the orbit and the body's
    /// scale but not its spin.
    pub ring: Option<Mat4>,
}

/// The animated part of the scene: a fixed sun and bodies on circular orbits
/// in the XZ plane.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarSystem {
    sun_size: f32,
    bodies: Vec<BodyConfig>,
}

impl SolarSystem {
    pub fn from_config(scene: &SceneConfig) -> Self {
        Self {
            sun_size: scene.sun.size,
            bodies: scene.bodies.clone(),
        }
    }

    pub fn bodies(&self) -> &[BodyConfig] {
        &self.bodies
    }

    pub fn sun_transform(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.sun_size))
    }

    /// Transform of every body at `t` seconds, in table order.
    pub fn body_transforms(&self, t: f32) -> Vec<BodyTransform> {
        self.bodies.iter().map(|body| body_transform(body, t)).collect()
    }
}

/// `rotY(t * orbit_speed) * T(orbit_radius, 0, 0) * S(size) * R(t * spin_speed, axis)`.
pub fn body_transform(body: &BodyConfig, t: f32) -> BodyTransform {
    let orbit = orbit_transform(body, t);
    let axis = Vec3::from_array(body.spin_axis).normalize_or_zero();
    let spin = if axis == Vec3::ZERO {
        Mat4::IDENTITY
    } else {
        Mat4::from_axis_angle(axis, t * body.spin_speed)
    };

    BodyTransform {
        model: orbit * spin,
        ring: body.ring.as_ref().map(|_| orbit),
    }
}

fn orbit_transform(body: &BodyConfig, t: f32) -> Mat4 {
    Mat4::from_rotation_y(t * body.orbit_speed)
        * Mat4::from_translation(Vec3::new(body.orbit_radius, 0.0, 0.0))
        * Mat4::from_scale(Vec3::splat(body.size))
}
