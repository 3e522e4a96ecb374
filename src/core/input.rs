//! Host input events and winit translation

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::events::Channel;

/// Keyboard payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyInput {
    pub code: KeyCode,
    /// True when the key was already held (auto-repeat)
    pub repeat: bool,
}

/// Mouse payload in window client coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub client_x: f32,
    pub client_y: f32,
    /// Button that changed state; `None` for moves
    pub button: Option<MouseButton>,
}

impl PointerInput {
    pub fn at(client_x: f32, client_y: f32) -> Self {
        Self { client_x, client_y, button: None }
    }

    pub fn with_button(client_x: f32, client_y: f32, button: MouseButton) -> Self {
        Self { client_x, client_y, button: Some(button) }
    }
}

/// Single touch point payload
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchInput {
    pub id: u64,
    pub client_x: f32,
    pub client_y: f32,
}

/// Input event delivered by the host
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    MouseDown(PointerInput),
    MouseUp(PointerInput),
    MouseMove(PointerInput),
    /// Scroll wheel, positive `delta_y` scrolls towards the user
    Wheel { delta_y: f32 },
    TouchStart(TouchInput),
    TouchEnd(TouchInput),
    TouchMove(TouchInput),
}

impl InputEvent {
    /// Channel this event is forwarded to, if any
    pub fn channel(&self) -> Option<Channel> {
        match self {
            InputEvent::KeyDown(_) => Some(Channel::KeyDown),
            InputEvent::KeyUp(_) => Some(Channel::KeyUp),
            InputEvent::MouseDown(_) => Some(Channel::MouseDown),
            InputEvent::MouseUp(_) => Some(Channel::MouseUp),
            InputEvent::MouseMove(_) => Some(Channel::MouseMove),
            InputEvent::Wheel { .. } => None,
            InputEvent::TouchStart(_) => Some(Channel::TouchStart),
            InputEvent::TouchEnd(_) => Some(Channel::TouchEnd),
            InputEvent::TouchMove(_) => Some(Channel::TouchMove),
        }
    }
}

/// Tracks cursor and key state to turn winit window events into [`InputEvent`]s
pub struct InputState {
    /// Currently pressed keys
    keys_pressed: HashSet<KeyCode>,
    /// Last known cursor position (winit button events carry none)
    mouse_position: (f32, f32),
}

impl InputState {
    /// Create new input state
    pub fn new() -> Self {
        Self {
            keys_pressed: HashSet::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    /// Translate a window event, updating tracked state
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    ..
                },
                ..
            } => Some(self.key(*code, *state)),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = (position.x as f32, position.y as f32);
                let (x, y) = self.mouse_position;
                Some(InputEvent::MouseMove(PointerInput::at(x, y)))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let (x, y) = self.mouse_position;
                let pointer = PointerInput::with_button(x, y, *button);
                Some(match state {
                    ElementState::Pressed => InputEvent::MouseDown(pointer),
                    ElementState::Released => InputEvent::MouseUp(pointer),
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta_y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y * 100.0,
                    MouseScrollDelta::PixelDelta(p) => -p.y as f32,
                };
                Some(InputEvent::Wheel { delta_y })
            }
            WindowEvent::Touch(touch) => {
                let input = TouchInput {
                    id: touch.id,
                    client_x: touch.location.x as f32,
                    client_y: touch.location.y as f32,
                };
                Some(match touch.phase {
                    TouchPhase::Started => InputEvent::TouchStart(input),
                    TouchPhase::Moved => InputEvent::TouchMove(input),
                    TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::TouchEnd(input),
                })
            }
            _ => None,
        }
    }

    fn key(&mut self, code: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => {
                let repeat = !self.keys_pressed.insert(code);
                InputEvent::KeyDown(KeyInput { code, repeat })
            }
            ElementState::Released => {
                self.keys_pressed.remove(&code);
                InputEvent::KeyUp(KeyInput { code, repeat: false })
            }
        }
    }

    /// Check if key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Get current mouse position
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_repeat_tracking() {
        let mut input = InputState::new();

        let first = input.key(KeyCode::KeyW, ElementState::Pressed);
        let second = input.key(KeyCode::KeyW, ElementState::Pressed);
        assert_eq!(first, InputEvent::KeyDown(KeyInput { code: KeyCode::KeyW, repeat: false }));
        assert_eq!(second, InputEvent::KeyDown(KeyInput { code: KeyCode::KeyW, repeat: true }));
        assert!(input.is_key_pressed(KeyCode::KeyW));

        input.key(KeyCode::KeyW, ElementState::Released);
        assert!(!input.is_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_event_channels() {
        let pointer = PointerInput::at(1.0, 2.0);
        assert_eq!(InputEvent::MouseMove(pointer).channel(), Some(Channel::MouseMove));
        assert_eq!(InputEvent::MouseUp(pointer).channel(), Some(Channel::MouseUp));
        assert_eq!(InputEvent::Wheel { delta_y: 1.0 }.channel(), None);

        let touch = TouchInput { id: 0, client_x: 0.0, client_y: 0.0 };
        assert_eq!(InputEvent::TouchEnd(touch).channel(), Some(Channel::TouchEnd));
    }
}
