//! Input Module
//!
//! Platform-agnostic locomotion input. The locomotion core consumes a
//! [`LocomotionInput`] per tick; [`MovementKeys`] is a convenience for hosts
//! that track raw key state.
//!
//! # Example
//!
//! ```rust,ignore
//! use terra_stride_engine::input::{KeyCode, MovementKeys};
//!
//! let mut keys = MovementKeys::new();
//! keys.handle_key(KeyCode::W, true);
//! let input = keys.to_input(camera_yaw);
//! controller.update(dt, &input);
//! ```

pub mod keyboard;

pub use keyboard::{KeyCode, MovementKeys};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One tick of locomotion intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocomotionInput {
    /// Desired ground-plane direction as world (x, z), length 0 or 1
    pub direction: Vec2,
    /// Jump requested this tick
    pub jump: bool,
    /// Run modifier held
    pub run: bool,
}

impl LocomotionInput {
    /// Build an input, normalizing `direction`. Zero or non-finite directions
    /// become no movement.
    pub fn new(direction: Vec2, jump: bool, run: bool) -> Self {
        Self {
            direction: unit_or_zero(direction),
            jump,
            run,
        }
    }

    /// `direction` as a unit vector, or zero when it is zero or non-finite.
    ///
    /// Fields are public, so consumers read the direction through this.
    pub fn planar_direction(&self) -> Vec2 {
        unit_or_zero(self.direction)
    }

    /// Movement along a direction, no jump, no run.
    pub fn walk(direction: Vec2) -> Self {
        Self::new(direction, false, false)
    }

    /// Jump in place.
    pub fn jump() -> Self {
        Self::new(Vec2::ZERO, true, false)
    }

    pub fn with_run(mut self, run: bool) -> Self {
        self.run = run;
        self
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    pub fn is_moving(&self) -> bool {
        self.planar_direction() != Vec2::ZERO
    }
}

fn unit_or_zero(direction: Vec2) -> Vec2 {
    if direction.is_finite() {
        direction.normalize_or_zero()
    } else {
        Vec2::ZERO
    }
}
