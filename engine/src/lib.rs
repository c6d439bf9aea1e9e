//! Terra Stride Engine Library
//!
//! First-person capsule locomotion and terrain collision. Moves a capsule
//! over static triangle-mesh terrain, keeps it resting on the ground, and
//! bounds collision cost with a time-boxed height cache and a fixed-interval
//! collision scheduler. Rendering, scene loading and input devices belong to
//! the host; this crate only consumes their outputs.
//!
//! # Modules
//!
//! - [`physics`] - Capsule, ray intersection, height cache, resolver, scheduler
//! - [`world`] - Scene meshes, terrain classification, procedural meshes
//! - [`player`] - Locomotion state machine and the per-frame controller
//! - [`input`] - Per-tick locomotion input and key-state helpers
//! - [`diagnostics`] - Timing samples, performance monitors, status snapshots
//! - [`config`] - Tunables with JSON loading and validation
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use terra_stride_engine::{LocomotionConfig, LocomotionInput, PlayerController};
//! use terra_stride_engine::world::{MeshId, MeshTags, generate_flat_ground, generate_water_plane};
//! use glam::{Vec2, Vec3};
//!
//! let mut controller = PlayerController::new(LocomotionConfig::default())?;
//!
//! // Water is filtered out; only the ground is collidable
//! controller.rebuild_terrain(&[
//!     Arc::new(generate_flat_ground(MeshId(1), MeshTags::kind("terrain"), Vec3::ZERO, 100.0, 16)),
//!     Arc::new(generate_water_plane(MeshId(2), Vec3::new(0.0, -1.0, 0.0), 300.0)),
//! ]);
//!
//! let state = controller.update(1.0 / 60.0, &LocomotionInput::walk(Vec2::X));
//! println!("{:?} at {}", state.mode, state.position);
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod input;
pub mod physics;
pub mod player;
pub mod world;

pub use config::LocomotionConfig;
pub use diagnostics::{PerformanceMonitor, PlayerStatus, RollingPerformanceMonitor, TimingSample};
pub use error::ConfigError;
pub use input::{KeyCode, LocomotionInput, MovementKeys};
pub use physics::{Capsule, CollisionResult};
pub use player::{LocomotionMode, LocomotionState, PlayerController};
pub use world::{MeshId, MeshTags, SceneMesh, TerrainRegistry, TerrainSet};
