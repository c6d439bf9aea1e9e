//! Player Module
//!
//! First-person capsule locomotion over static terrain.
//!
//! # Components
//!
//! - [`PlayerLocomotion`] - Grounded/airborne state machine: input, jump, gravity
//!   - Coyote time lets a jump land shortly after walking off an edge
//! - [`PlayerController`] - Per-frame façade over registry, resolver, scheduler
//!   and locomotion, plus the debug hooks
//! - [`LocomotionState`] - Published position/velocity/mode snapshot

pub mod controller;
pub mod locomotion;

pub use controller::PlayerController;
pub use locomotion::{LocomotionMode, LocomotionState, PlayerLocomotion};
