//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! The demo only consumes the Escape edge, but the held/just-pressed split
//! is kept so a press and its release observed within the same frame still
//! register. Edge state is cleared by `end_frame()`, which the loop calls
//! once per iteration after the update pass has consumed it.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    /// Pointer position in window coordinates (physical pixels, as the
    /// platform reports them). The loop rescales to screen coordinates.
    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
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
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        assert!(input.is_held(Key::Escape));
        assert!(input.is_just_pressed(Key::Escape));
    }

    #[test]
    fn key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        input.key_up(Key::Escape);
        assert!(!input.is_held(Key::Escape));
        assert!(input.is_just_released(Key::Escape));
    }

    #[test]
    fn os_key_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        input.end_frame();
        // A repeat event while already held must not re-trigger the edge.
        input.key_down(Key::Escape);
        assert!(input.is_held(Key::Escape));
        assert!(!input.is_just_pressed(Key::Escape));
    }

    #[test]
    fn key_up_without_down_is_a_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::Escape);
        assert!(!input.is_just_released(Key::Escape));
        assert!(!input.is_held(Key::Escape));
    }

    #[test]
    fn end_frame_clears_edges_but_not_held() {
        let mut input = InputState::new();
        input.key_down(Key::Escape);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Escape));
        assert!(input.is_held(Key::Escape));
    }

    #[test]
    fn mouse_position_defaults_to_origin() {
        let input = InputState::new();
        assert_eq!(input.mouse_position, (0.0, 0.0));
    }
}
