use std::collections::HashSet;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Keyboard and mouse state, sampled from window events and rolled once per frame.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_down_last_frame: HashSet<KeyCode>,
    left_button: bool,
    cursor: Option<PhysicalPosition<f64>>,
    mouse_delta: [f32; 2],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.keys_down.insert(key);
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
            }
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.left_button = state == ElementState::Pressed;
        }
    }

    pub fn process_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if let Some(previous) = self.cursor {
            self.mouse_delta[0] += (position.x - previous.x) as f32;
            self.mouse_delta[1] += (position.y - previous.y) as f32;
        }
        self.cursor = Some(position);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// True only on the frame the key went down.
    pub fn was_key_pressed_this_frame(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key) && !self.keys_down_last_frame.contains(&key)
    }

    pub fn is_left_button_down(&self) -> bool {
        self.left_button
    }

    /// Cursor movement in pixels accumulated since the last `end_frame`.
    pub fn mouse_delta(&self) -> [f32; 2] {
        self.mouse_delta
    }

    pub fn end_frame(&mut self) {
        self.keys_down_last_frame.clone_from(&self.keys_down);
        self.mouse_delta = [0.0, 0.0];
    }

    /// Drops held keys, e.g. when the window loses focus and releases go unseen.
    pub fn clear(&mut self) {
        self.keys_down.clear();
        self.left_button = false;
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_press_is_edge_triggered() {
        let mut input = InputState::new();
        input.process_key(KeyCode::Space, ElementState::Pressed);
        assert!(input.was_key_pressed_this_frame(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.end_frame();
        // OS key repeat delivers more presses while held
        input.process_key(KeyCode::Space, ElementState::Pressed);
        assert!(!input.was_key_pressed_this_frame(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.process_key(KeyCode::Space, ElementState::Released);
        input.end_frame();
        input.process_key(KeyCode::Space, ElementState::Pressed);
        assert!(input.was_key_pressed_this_frame(KeyCode::Space));
    }

    #[test]
    fn mouse_delta_accumulates_until_end_of_frame() {
        let mut input = InputState::new();
        input.process_cursor_moved(PhysicalPosition::new(10.0, 10.0));
        assert_eq!(input.mouse_delta(), [0.0, 0.0]);

        input.process_cursor_moved(PhysicalPosition::new(13.0, 8.0));
        input.process_cursor_moved(PhysicalPosition::new(15.0, 9.0));
        assert_eq!(input.mouse_delta(), [5.0, -1.0]);

        input.end_frame();
        assert_eq!(input.mouse_delta(), [0.0, 0.0]);
    }

    #[test]
    fn only_left_button_is_tracked() {
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        assert!(!input.is_left_button_down());
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_left_button_down());
        input.clear();
        assert!(!input.is_left_button_down());
    }
}
