//! Locomotion Configuration
//!
//! Centralized tunables for the capsule, movement, collision cadence,
//! height cache and diagnostics. Every section has `Default` values matching
//! the shipped game feel, and `#[serde(default)]` lets a JSON file override
//! only the fields it names.
//!
//! ```rust,ignore
//! use terra_stride_engine::config::LocomotionConfig;
//!
//! let config = LocomotionConfig::from_json_str(r#"{ "movement": { "move_speed": 30.0 } }"#)?;
//! assert_eq!(config.capsule.radius, 0.5);
//! ```

use std::path::Path;
use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ensure_at_most, ensure_non_negative, ensure_positive};

/// Upper bound for `movement.max_tick_delta`, seconds.
pub const MAX_TICK_DELTA_LIMIT: f32 = 1.0;

/// Upper bound for `collision.footprint_samples`.
pub const MAX_FOOTPRINT_SAMPLES: usize = 32;

/// Player collision volume dimensions and spawn point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Capsule radius in meters
    pub radius: f32,
    /// Total capsule height in meters (base to top)
    pub height: f32,
    /// Initial capsule centre
    pub spawn_position: Vec3,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            spawn_position: Vec3::new(0.0, 10.0, 0.0),
        }
    }
}

/// Horizontal speed, jump and gravity tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Base horizontal speed in m/s
    pub move_speed: f32,
    /// Multiplier applied to `move_speed` while running
    pub run_multiplier: f32,
    /// Upward velocity set by a jump, m/s
    pub jump_impulse: f32,
    /// Gravity magnitude in m/s² (always pulls toward -Y)
    pub gravity: f32,
    /// Seconds after leaving the ground during which a jump is still accepted
    pub coyote_time: f32,
    /// Largest tick delta integrated in one step, seconds (at most 1)
    pub max_tick_delta: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 25.0,
            run_multiplier: 2.0,
            jump_impulse: 8.0,
            gravity: 20.0,
            coyote_time: 0.1,
            max_tick_delta: 0.1,
        }
    }
}

/// Ground contact resolution and cadence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Distance above the ground still counted as contact, meters
    pub ground_tolerance: f32,
    /// Number of samples on the ring around the capsule footprint (1 to 32)
    pub footprint_samples: usize,
    /// Ring radius as a fraction of the capsule radius
    pub footprint_scale: f32,
    /// Minimum time between fresh resolves, milliseconds (0 = every tick)
    pub check_interval_ms: u64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            ground_tolerance: 0.05,
            footprint_samples: 6,
            footprint_scale: 1.0,
            check_interval_ms: 16,
        }
    }
}

impl CollisionConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}

/// Raycast height cache bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Sample lifetime in milliseconds
    pub ttl_ms: u64,
    /// Grid cell size used to quantize sample locations, meters
    pub resolution: f32,
    /// Maximum number of cached samples
    pub capacity: usize,
    /// World Y the downward probe starts from
    pub probe_height: f32,
    /// Maximum probe length below `probe_height`
    pub max_probe_distance: f32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 100,
            resolution: 0.1,
            capacity: 1024,
            probe_height: 1000.0,
            max_probe_distance: 4000.0,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

/// Diagnostic toggles handed to the controller at construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Log every fresh resolve at debug level
    pub collision_logging: bool,
    /// Periodically log performance summaries
    pub performance_display: bool,
    /// Number of timing samples kept for rolling statistics
    pub window: usize,
    /// Log a summary every N samples while the display is on
    pub display_every: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            collision_logging: false,
            performance_display: false,
            window: 120,
            display_every: 60,
        }
    }
}

/// Complete locomotion configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    pub capsule: CapsuleConfig,
    pub movement: MovementConfig,
    pub collision: CollisionConfig,
    pub cache: CacheConfig,
    pub diagnostics: DiagnosticsConfig,
}

impl LocomotionConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject any value that would make the simulation meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("capsule.radius", self.capsule.radius)?;
        ensure_positive("capsule.height", self.capsule.height)?;

        ensure_positive("movement.move_speed", self.movement.move_speed)?;
        ensure_positive("movement.run_multiplier", self.movement.run_multiplier)?;
        ensure_positive("movement.jump_impulse", self.movement.jump_impulse)?;
        ensure_positive("movement.gravity", self.movement.gravity)?;
        ensure_non_negative("movement.coyote_time", self.movement.coyote_time)?;
        ensure_positive("movement.max_tick_delta", self.movement.max_tick_delta)?;
        ensure_at_most(
            "movement.max_tick_delta",
            self.movement.max_tick_delta,
            MAX_TICK_DELTA_LIMIT,
        )?;

        ensure_non_negative("collision.ground_tolerance", self.collision.ground_tolerance)?;
        ensure_non_negative("collision.footprint_scale", self.collision.footprint_scale)?;
        let count = self.collision.footprint_samples;
        if !(1..=MAX_FOOTPRINT_SAMPLES).contains(&count) {
            return Err(ConfigError::InvalidSampleCount {
                count,
                max: MAX_FOOTPRINT_SAMPLES,
            });
        }

        ensure_positive("cache.resolution", self.cache.resolution)?;
        ensure_positive("cache.ttl_ms", self.cache.ttl_ms as f32)?;
        ensure_positive("cache.capacity", self.cache.capacity as f32)?;
        ensure_positive("cache.max_probe_distance", self.cache.max_probe_distance)?;

        Ok(())
    }
}
