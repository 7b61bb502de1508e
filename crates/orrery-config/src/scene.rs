//! The solar-system body table.

use serde::{Deserialize, Serialize};

/// What gets drawn: the sun, the bodies orbiting it and the backdrop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// The central, unlit body.
    pub sun: SunConfig,
    /// Orbiting bodies, drawn in order.
    pub bodies: Vec<BodyConfig>,
    /// Longitude segments of the shared body sphere.
    pub sphere_longitude_segments: u32,
    /// Latitude segments of the shared body sphere.
    pub sphere_latitude_segments: u32,
    /// Full-screen backdrop texture, relative to the asset root.
    pub background_texture: String,
}

/// The sun sits at the origin and does not move.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunConfig {
    pub texture: String,
    /// Uniform scale applied to the unit sphere.
    pub size: f32,
}

/// One body orbiting the sun.
///
/// The model transform is `rotY(t * orbit_speed) * T(orbit_radius, 0, 0) *
/// S(size) * R(t * spin_speed, spin_axis)` with `t` in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    pub name: String,
    /// Texture path, relative to the asset root.
    pub texture: String,
    /// Distance from the sun in world units.
    pub orbit_radius: f32,
    /// Orbital angular speed in radians per second.
    pub orbit_speed: f32,
    /// Uniform scale applied to the unit sphere.
    pub size: f32,
    /// Spin angular speed in radians per second.
    pub spin_speed: f32,
    /// Spin axis in body space. Need not be normalized; zero disables spin.
    pub spin_axis: [f32; 3],
    /// Optional flat ring around the body's equator.
    pub ring: Option<RingConfig>,
}

/// A flat annulus attached to a body, in the body's scaled space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RingConfig {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: u32,
    pub texture: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            sun: SunConfig::default(),
            bodies: default_planets(),
            sphere_longitude_segments: 36,
            sphere_latitude_segments: 18,
            background_texture: "textures/bg.bmp".to_string(),
        }
    }
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            texture: "textures/sun.bmp".to_string(),
            size: 1.0,
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            texture: String::new(),
            orbit_radius: 0.0,
            orbit_speed: 0.0,
            size: 1.0,
            spin_speed: 0.0,
            spin_axis: [0.0, 1.0, 0.0],
            ring: None,
        }
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            inner_radius: 1.2,
            outer_radius: 2.0,
            segments: 64,
            texture: "textures/saturn_ring.bmp".to_string(),
        }
    }
}

impl SceneConfig {
    /// Look up a body by name.
    pub fn body(&self, name: &str) -> Option<&BodyConfig> {
        self.bodies.iter().find(|b| b.name == name)
    }

    /// Number of bodies carrying a ring.
    pub fn ring_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.ring.is_some()).count()
    }
}

/// The eight planets with compressed distances and exaggerated sizes.
///
/// Distances are the real semi-major axes (in units of 0.1 AU) scaled down
/// progressively for the outer planets so the whole system fits on screen.
fn default_planets() -> Vec<BodyConfig> {
    // (name, texture, orbit_speed, orbit_radius, size)
    let table: [(&str, &str, f32, f32, f32); 8] = [
        ("mercury", "mercury", 0.24, 3.871 * 0.5, 0.038),
        ("venus", "venus", 0.21, 7.233 * 0.45, 0.09),
        ("earth", "earth", 0.18, 10.0 * 0.4, 0.10),
        ("mars", "mars", 0.15, 15.237 * 0.35, 0.05),
        ("jupiter", "jupiter", 0.12, 26.034 * 0.30, 0.6),
        ("saturn", "saturn", 0.09, 37.371 * 0.25, 0.45),
        ("uranus", "uranus", 0.06, 45.913 * 0.25, 0.2),
        ("neptune", "neptun", 0.03, 54.0 * 0.25, 0.19),
    ];

    table
        .iter()
        .enumerate()
        .map(|(i, &(name, texture, orbit_speed, orbit_radius, size))| BodyConfig {
            name: name.to_string(),
            texture: format!("textures/{texture}.bmp"),
            orbit_radius,
            orbit_speed,
            size,
            spin_speed: 2.0 / (i as f32 + 1.0),
            spin_axis: [0.1, 1.0, 0.1],
            ring: (name == "saturn").then(RingConfig::default),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_eight_planets() {
        let scene = SceneConfig::default();
        assert_eq!(scene.bodies.len(), 8);
        assert_eq!(scene.bodies[0].name, "mercury");
        assert_eq!(scene.bodies[7].name, "neptune");
        assert_eq!(scene.bodies[7].texture, "textures/neptun.bmp");
    }

    #[test]
    fn test_only_saturn_has_a_ring() {
        let scene = SceneConfig::default();
        assert_eq!(scene.ring_count(), 1);
        let saturn = scene.body("saturn").expect("saturn in default table");
        let ring = saturn.ring.as_ref().expect("saturn ring");
        assert_eq!(ring.inner_radius, 1.2);
        assert_eq!(ring.outer_radius, 2.0);
        assert_eq!(ring.segments, 64);
    }

    #[test]
    fn test_orbits_slow_down_outward() {
        let scene = SceneConfig::default();
        for pair in scene.bodies.windows(2) {
            assert!(pair[0].orbit_radius < pair[1].orbit_radius);
            assert!(pair[0].orbit_speed > pair[1].orbit_speed);
            assert!(pair[0].spin_speed > pair[1].spin_speed);
        }
    }

    #[test]
    fn test_spin_speed_formula() {
        let scene = SceneConfig::default();
        assert_eq!(scene.bodies[0].spin_speed, 2.0);
        assert_eq!(scene.bodies[1].spin_speed, 1.0);
        assert!((scene.bodies[7].spin_speed - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_body_lookup_misses_unknown() {
        assert!(SceneConfig::default().body("pluto").is_none());
    }
}
