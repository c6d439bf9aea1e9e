//! Player collision capsule
//!
//! A vertical cylinder capped with hemispheres. Only the base height and the
//! horizontal footprint matter for terrain contact.

use glam::{Vec2, Vec3};

use crate::config::CapsuleConfig;
use crate::error::{ConfigError, ensure_positive};

/// Player collision volume. Dimensions are validated once at construction and
/// never change afterwards; only the centre moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    radius: f32,
    height: f32,
    /// Capsule centre in world space
    pub center: Vec3,
}

impl Capsule {
    /// Create a capsule, rejecting non-positive dimensions.
    pub fn new(radius: f32, height: f32, center: Vec3) -> Result<Self, ConfigError> {
        ensure_positive("capsule.radius", radius)?;
        ensure_positive("capsule.height", height)?;
        Ok(Self {
            radius,
            height,
            center,
        })
    }

    pub fn from_config(config: &CapsuleConfig) -> Result<Self, ConfigError> {
        Self::new(config.radius, config.height, config.spawn_position)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn half_height(&self) -> f32 {
        self.height * 0.5
    }

    /// Lowest point of the capsule.
    pub fn base_y(&self) -> f32 {
        self.center.y - self.half_height()
    }

    /// Highest point of the capsule.
    pub fn top_y(&self) -> f32 {
        self.center.y + self.half_height()
    }

    /// Centre height at which the base rests exactly on `ground_y`.
    pub fn resting_center_y(&self, ground_y: f32) -> f32 {
        ground_y + self.half_height()
    }

    /// Copy of this capsule moved to `center`.
    pub fn translated_to(&self, center: Vec3) -> Self {
        Self { center, ..*self }
    }

    /// Ground-plane (x, z) points evenly spaced on a ring around the centre.
    ///
    /// `scale` is the ring radius as a fraction of the capsule radius.
    pub fn footprint_ring(&self, count: usize, scale: f32) -> impl Iterator<Item = Vec2> + '_ {
        let ring = self.radius * scale;
        let step = std::f32::consts::TAU / count.max(1) as f32;
        (0..count).map(move |i| {
            let angle = i as f32 * step;
            Vec2::new(
                self.center.x + ring * angle.cos(),
                self.center.z + ring * angle.sin(),
            )
        })
    }
}
