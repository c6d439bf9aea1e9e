//! Player Locomotion State Machine
//!
//! Owns position, velocity and the grounded/airborne state. Each tick is
//! split in two so the caller can decide how collision is obtained:
//!
//! 1. [`PlayerLocomotion::propose`] applies input, jump and gravity and
//!    returns the proposed capsule centre.
//! 2. [`PlayerLocomotion::apply`] accepts a [`CollisionResult`] for that
//!    proposal and commits the new state.
//!
//! # Physics Model
//!
//! - Horizontal velocity is set directly from input: no acceleration ramp.
//! - A jump sets vertical velocity to the impulse on the tick it is pressed,
//!   without gravity applied that tick.
//! - While airborne, gravity is integrated explicitly (v -= g·dt, then p += v·dt).
//! - A grounded result is ignored while the capsule is still rising.
//!
//! # Usage
//!
//! ```rust,ignore
//! let proposed = locomotion.propose(dt, &input, now);
//! let result = resolver.resolve(&capsule, proposed, terrain, now);
//! locomotion.apply(proposed, &result, now);
//! ```

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use static_assertions::assert_impl_all;

use crate::config::MovementConfig;
use crate::input::LocomotionInput;
use crate::physics::CollisionResult;

/// Contact state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionMode {
    Grounded,
    #[default]
    Airborne,
}

/// Published per-tick state. Readers get copies; only [`PlayerLocomotion`] writes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LocomotionState {
    /// Capsule centre
    pub position: Vec3,
    /// World-space velocity, u/s
    pub velocity: Vec3,
    pub mode: LocomotionMode,
    /// Simulation time of the most recent grounded tick
    pub last_grounded_time: Option<Duration>,
}

assert_impl_all!(LocomotionState: Send, Sync, Copy);
assert_impl_all!(LocomotionMode: Send, Sync, Copy);

impl LocomotionState {
    pub fn is_grounded(&self) -> bool {
        self.mode == LocomotionMode::Grounded
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

/// Grounded/airborne state machine for the player capsule.
#[derive(Debug, Clone)]
pub struct PlayerLocomotion {
    state: LocomotionState,
    movement: MovementConfig,
    /// Cleared by a jump so the coyote window cannot be used twice
    coyote_available: bool,
}

impl PlayerLocomotion {
    /// Start airborne at `position` with zero velocity.
    pub fn new(movement: MovementConfig, position: Vec3) -> Self {
        Self {
            state: LocomotionState {
                position,
                ..Default::default()
            },
            movement,
            coyote_available: false,
        }
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    /// Clamp a host-supplied tick delta to `[0, max_tick_delta]`. Non-finite
    /// deltas count as zero.
    pub fn sanitize_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.movement.max_tick_delta)
        } else {
            0.0
        }
    }

    /// Whether a jump pressed at `now` would be accepted.
    pub fn can_jump(&self, now: Duration) -> bool {
        match self.state.mode {
            LocomotionMode::Grounded => true,
            LocomotionMode::Airborne => {
                self.coyote_available
                    && self.state.last_grounded_time.is_some_and(|t| {
                        now.saturating_sub(t).as_secs_f32() <= self.movement.coyote_time
                    })
            }
        }
    }

    /// Apply input, jump and gravity; return the proposed capsule centre.
    pub fn propose(&mut self, dt: f32, input: &LocomotionInput, now: Duration) -> Vec3 {
        let dt = self.sanitize_dt(dt);

        let speed = if input.run {
            self.movement.move_speed * self.movement.run_multiplier
        } else {
            self.movement.move_speed
        };
        let direction = input.planar_direction();
        self.state.velocity.x = direction.x * speed;
        self.state.velocity.z = direction.y * speed;

        if input.jump && self.can_jump(now) {
            self.state.velocity.y = self.movement.jump_impulse;
            self.state.mode = LocomotionMode::Airborne;
            self.coyote_available = false;
        } else if self.state.mode == LocomotionMode::Airborne {
            self.state.velocity.y -= self.movement.gravity * dt;
        }

        self.state.position + self.state.velocity * dt
    }

    /// Commit the tick: accept the collision result for `proposed`.
    ///
    /// Horizontal position always comes from `proposed`.
    pub fn apply(&mut self, proposed: Vec3, result: &CollisionResult, now: Duration) {
        let rising = self.state.velocity.y > 0.0;

        if result.is_grounded && !rising {
            self.state.position = Vec3::new(proposed.x, result.position.y, proposed.z);
            self.state.velocity.y = 0.0;
            self.state.mode = LocomotionMode::Grounded;
            self.state.last_grounded_time = Some(now);
            self.coyote_available = true;
        } else {
            self.state.position = proposed;
            self.state.mode = LocomotionMode::Airborne;
        }
    }

    /// Move to `position` with zero velocity, airborne until the next grounded result.
    pub fn teleport(&mut self, position: Vec3) {
        self.state = LocomotionState {
            position,
            velocity: Vec3::ZERO,
            mode: LocomotionMode::Airborne,
            last_grounded_time: None,
        };
        self.coyote_available = false;
    }
}
