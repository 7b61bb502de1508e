//! Free-look camera driven by Euler angles.
//!
//! The camera stores yaw and pitch in degrees and derives its orthonormal
//! basis (`front`, `right`, `up`) from them and a fixed world-up vector.
//! The basis is recomputed from scratch whenever an angle changes, never
//! rotated incrementally, so it cannot drift.

use glam::{Mat4, Vec3};

/// Default yaw in degrees: looking down -Z.
pub const YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const PITCH: f32 = 0.0;
/// Default movement speed in world units per second.
pub const SPEED: f32 = 10.0;
/// Default degrees of rotation per unit of mouse movement.
pub const SENSITIVITY: f32 = 0.05;
/// Default vertical field of view in degrees.
pub const ZOOM: f32 = 45.0;

/// Pitch limit in degrees. Keeps `front` away from `world_up`.
pub const PITCH_LIMIT: f32 = 89.0;
/// Narrowest field of view reachable by scrolling, in degrees.
pub const ZOOM_MIN: f32 = 1.0;
/// Widest field of view reachable by scrolling, in degrees.
pub const ZOOM_MAX: f32 = 45.0;

/// Direction of a keyboard-driven camera step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// A first-person camera with yaw/pitch orientation and scroll zoom.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    /// Degrees. Unbounded; the trigonometry wraps it.
    yaw: f32,
    /// Degrees, within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    zoom: f32,
}

impl Camera {
    /// Create a camera at `position` with the given world-up vector and
    /// angles in degrees. Speed, sensitivity and zoom take their defaults.
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: world_up,
            right: Vec3::X,
            world_up,
            yaw,
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Camera at `position` looking down -Z with +Y up.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::Y, YAW, PITCH)
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    /// Set the initial field of view, clamped to `[ZOOM_MIN, ZOOM_MAX]`.
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self
    }

    /// Look-at transform from `position` toward `position + front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection using `zoom` as the vertical field of view.
    ///
    /// Uses reverse-Z: `near` maps to depth 1 and `far` to depth 0.
    pub fn projection_matrix(&self, aspect_ratio: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.zoom.to_radians(),
            aspect_ratio.max(f32::EPSILON),
            far,
            near,
        )
    }

    /// Step along `front` or `right` by `movement_speed * dt`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Turn by raw mouse offsets. `y_offset` is positive when looking up.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_camera_vectors();
    }

    /// Narrow (positive offset) or widen the field of view.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    // Degenerate when front is parallel to world_up; the pitch limit keeps
    // the default configuration clear of that.
    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
