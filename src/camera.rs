use nalgebra_glm as glm;
use nalgebra_glm::{Mat4, Vec3};
use winit::keyboard::KeyCode;

use crate::config::CameraConfig;
use crate::game_time::GameTime;
use crate::input::InputState;

const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Right-handed first-person camera. Zero yaw and pitch looks down -Z.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub field_of_view: f32,
    pub aspect: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub movement_rate: f32,
    pub mouse_sensitivity: f32,
    initial_position: Vec3,
}

impl FirstPersonCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        let position = Vec3::from(config.position);
        FirstPersonCamera {
            position,
            yaw: 0.0,
            pitch: 0.0,
            field_of_view: config.field_of_view,
            aspect,
            near_plane: config.near_plane,
            far_plane: config.far_plane,
            movement_rate: config.movement_rate,
            mouse_sensitivity: config.mouse_sensitivity,
            initial_position: position,
        }
    }

    pub fn direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    pub fn right(&self) -> Vec3 {
        glm::normalize(&glm::cross(&self.direction(), &Vec3::y()))
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn reset(&mut self) {
        self.position = self.initial_position;
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    /// Positive `delta_x` turns right, positive `delta_y` looks down (screen space).
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * self.mouse_sensitivity;
        self.pitch = (self.pitch - delta_y * self.mouse_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn update(&mut self, time: &GameTime, input: &InputState) {
        if input.was_key_pressed_this_frame(KeyCode::KeyQ) {
            self.reset();
        }

        let mut movement = Vec3::zeros();
        if input.is_key_down(KeyCode::KeyW) {
            movement.y += 1.0;
        }
        if input.is_key_down(KeyCode::KeyS) {
            movement.y -= 1.0;
        }
        if input.is_key_down(KeyCode::KeyD) {
            movement.x += 1.0;
        }
        if input.is_key_down(KeyCode::KeyA) {
            movement.x -= 1.0;
        }

        let step = self.movement_rate * time.elapsed_seconds();
        self.position += self.direction() * movement.y * step + self.right() * movement.x * step;

        if input.is_left_button_down() {
            let [delta_x, delta_y] = input.mouse_delta();
            self.rotate(delta_x, delta_y);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        glm::look_at_rh(
            &self.position,
            &(self.position + self.direction()),
            &Vec3::y(),
        )
    }

    /// Depth maps to [0, 1] as wgpu expects.
    pub fn projection_matrix(&self) -> Mat4 {
        glm::perspective_rh_zo(
            self.aspect,
            self.field_of_view,
            self.near_plane,
            self.far_plane,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::time::Duration;
    use winit::event::ElementState;

    fn camera() -> FirstPersonCamera {
        FirstPersonCamera::new(&CameraConfig::default(), 4.0 / 3.0)
    }

    fn one_second() -> GameTime {
        GameTime::new(Duration::from_secs(1), Duration::from_secs(1))
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let camera = camera();
        assert_relative_eq!(camera.direction(), Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(camera.right(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn origin_projects_inside_clip_volume() {
        let camera = camera();
        let clip = camera.view_projection() * glm::vec4(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y < 0.0 && ndc.y > -1.0);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn forward_key_moves_along_direction() {
        let mut camera = camera();
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyW, ElementState::Pressed);
        camera.update(&one_second(), &input);
        assert_relative_eq!(camera.position, Vec3::new(0.0, 2.5, -75.0), epsilon = 1e-4);
    }

    #[test]
    fn strafe_moves_along_right() {
        let mut camera = camera();
        let mut input = InputState::new();
        input.process_key(KeyCode::KeyA, ElementState::Pressed);
        camera.update(&one_second(), &input);
        assert_relative_eq!(camera.position, Vec3::new(-100.0, 2.5, 25.0), epsilon = 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = camera();
        camera.rotate(0.0, -1.0e6);
        assert_relative_eq!(camera.pitch, MAX_PITCH);
        camera.rotate(0.0, 1.0e6);
        assert_relative_eq!(camera.pitch, -MAX_PITCH);
    }

    #[test]
    fn dragging_right_turns_right() {
        let mut camera = camera();
        camera.rotate(100.0, 0.0);
        assert!(camera.direction().x > 0.0);
    }

    #[test]
    fn reset_restores_initial_pose() {
        let mut camera = camera();
        camera.position = Vec3::new(1.0, 2.0, 3.0);
        camera.rotate(40.0, 20.0);

        let mut input = InputState::new();
        input.process_key(KeyCode::KeyQ, ElementState::Pressed);
        camera.update(&GameTime::default(), &input);

        assert_relative_eq!(camera.position, Vec3::new(0.0, 2.5, 25.0));
        assert_eq!(camera.yaw, 0.0);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn zero_sized_window_keeps_aspect() {
        let mut camera = camera();
        camera.set_aspect(0, 600);
        assert_relative_eq!(camera.aspect, 4.0 / 3.0);
        camera.set_aspect(800, 400);
        assert_relative_eq!(camera.aspect, 2.0);
    }
}
