//! Keyboard and mouse to camera.
//!
//! W/S/A/D move, the mouse looks around, the wheel zooms and Escape quits.

use orrery_camera::{Camera, CameraMovement};
use orrery_input::{KeyboardState, MouseState};
use winit::keyboard::KeyCode;

const MOVEMENT_KEYS: [(KeyCode, CameraMovement); 4] = [
    (KeyCode::KeyW, CameraMovement::Forward),
    (KeyCode::KeyS, CameraMovement::Backward),
    (KeyCode::KeyA, CameraMovement::Left),
    (KeyCode::KeyD, CameraMovement::Right),
];

pub const EXIT_KEY: KeyCode = KeyCode::Escape;

/// Camera step bound to `code`, if any.
pub fn movement_for(code: KeyCode) -> Option<CameraMovement> {
    MOVEMENT_KEYS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|&(_, movement)| movement)
}

/// Feed one frame of input into `camera`. Returns `true` when the user asked
/// to quit.
pub fn apply_input(
    camera: &mut Camera,
    keyboard: &KeyboardState,
    mouse: &MouseState,
    dt: f32,
) -> bool {
    if keyboard.code_just_pressed(EXIT_KEY) {
        return true;
    }

    for (key, movement) in MOVEMENT_KEYS {
        if keyboard.is_code_pressed(key) {
            camera.process_keyboard(movement, dt);
        }
    }

    let look = mouse.look_offset();
    if look != glam::Vec2::ZERO {
        camera.process_mouse_movement(look.x, look.y, true);
    }

    let scroll = mouse.scroll();
    if scroll != 0.0 {
        camera.process_mouse_scroll(scroll);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_input::RawKeyEvent;
    use winit::event::{ElementState, MouseScrollDelta};

    fn camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::Y, -90.0, 0.0)
    }

    fn pressed(codes: &[KeyCode]) -> KeyboardState {
        let mut kb = KeyboardState::new();
        for &code in codes {
            kb.process_raw(RawKeyEvent::new(code, ElementState::Pressed));
        }
        kb
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(movement_for(KeyCode::KeyW), Some(CameraMovement::Forward));
        assert_eq!(movement_for(KeyCode::KeyD), Some(CameraMovement::Right));
        assert_eq!(movement_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_escape_requests_exit() {
        let mut cam = camera();
        let before = cam.clone();
        assert!(apply_input(
            &mut cam,
            &pressed(&[KeyCode::Escape, KeyCode::KeyW]),
            &MouseState::new(),
            0.1
        ));
        assert_eq!(cam, before);
    }

    #[test]
    fn test_escape_tapped_within_one_frame_still_exits() {
        let mut kb = pressed(&[KeyCode::Escape]);
        kb.process_raw(RawKeyEvent::new(KeyCode::Escape, ElementState::Released));
        assert!(!kb.is_code_pressed(KeyCode::Escape));
        assert!(apply_input(&mut camera(), &kb, &MouseState::new(), 0.016));
    }

    #[test]
    fn test_forward_scales_with_delta() {
        let mut cam = camera();
        assert!(!apply_input(&mut cam, &pressed(&[KeyCode::KeyW]), &MouseState::new(), 0.1));
        // speed 10 * 0.1 s along -Z
        assert!((cam.position() - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut cam = camera();
        apply_input(&mut cam, &pressed(&[KeyCode::KeyA, KeyCode::KeyD]), &MouseState::new(), 0.5);
        assert!((cam.position() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_mouse_up_pitches_up() {
        let mut cam = camera();
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(600.0, 450.0);
        mouse.on_cursor_moved(600.0, 350.0);
        apply_input(&mut cam, &KeyboardState::new(), &mouse, 0.016);
        // 100 px * 0.05 sensitivity
        assert!((cam.pitch() - 5.0).abs() < 1e-4);
        assert!((cam.yaw() + 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_scroll_zooms_in() {
        let mut cam = camera();
        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        apply_input(&mut cam, &KeyboardState::new(), &mouse, 0.016);
        assert_eq!(cam.zoom(), 43.0);
    }
}
