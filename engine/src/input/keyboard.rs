//! Keyboard Input Module
//!
//! Movement key state, decoupled from any windowing system. The host maps its
//! own key events onto [`KeyCode`] and feeds them to [`MovementKeys`].

use glam::Vec2;

use super::LocomotionInput;

/// Generic key codes for locomotion, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    ShiftLeft,
    ShiftRight,

    /// Catch-all for keys locomotion ignores
    Unknown,
}

/// Tracks which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    /// W / Up - move forward
    pub forward: bool,
    /// S / Down - move backward
    pub backward: bool,
    /// A / Left - strafe left
    pub left: bool,
    /// D / Right - strafe right
    pub right: bool,
    /// Space - jump
    pub jump: bool,
    /// Shift - run
    pub run: bool,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state for a key press/release.
    ///
    /// Returns `true` if the key is a movement key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W | KeyCode::ArrowUp => self.forward = pressed,
            KeyCode::S | KeyCode::ArrowDown => self.backward = pressed,
            KeyCode::A | KeyCode::ArrowLeft => self.left = pressed,
            KeyCode::D | KeyCode::ArrowRight => self.right = pressed,
            KeyCode::Space => self.jump = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.run = pressed,
            KeyCode::Unknown => return false,
        }
        true
    }

    /// Check if any directional key is held.
    pub fn any_pressed(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Forward/backward axis (-1, 0, or 1).
    pub fn forward_axis(&self) -> i32 {
        (self.forward as i32) - (self.backward as i32)
    }

    /// Left/right axis (-1, 0, or 1).
    pub fn right_axis(&self) -> i32 {
        (self.right as i32) - (self.left as i32)
    }

    /// Convert held keys into a world-space locomotion input for a camera yaw.
    ///
    /// Yaw is in radians with 0 looking toward -Z; forward is
    /// `(sin(yaw), -cos(yaw))` on the ground plane and right is perpendicular
    /// to it.
    pub fn to_input(&self, camera_yaw: f32) -> LocomotionInput {
        let forward = Vec2::new(camera_yaw.sin(), -camera_yaw.cos());
        let right = Vec2::new(camera_yaw.cos(), camera_yaw.sin());
        let direction =
            forward * self.forward_axis() as f32 + right * self.right_axis() as f32;

        LocomotionInput::new(direction, self.jump, self.run)
    }
}
