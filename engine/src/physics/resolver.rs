//! Capsule Collision Resolver
//!
//! Resolves a proposed capsule position against the terrain set. The ground
//! height is the highest terrain found under the capsule centre and a ring of
//! footprint samples; the capsule is grounded when its base is at or below
//! that height plus a small tolerance.
//!
//! Corrections only ever move the capsule to resting contact. A capsule more
//! than the tolerance above ground is returned untouched, and a capsule with
//! no terrain beneath any sample keeps falling.

use std::time::Duration;

use glam::Vec3;
use serde::Serialize;

use super::capsule::Capsule;
use super::height_cache::{CacheStats, RaycastHeightCache};
use super::types::ground_plane;
use crate::config::{CacheConfig, CollisionConfig};
use crate::world::TerrainSet;

/// Outcome of resolving one proposed position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CollisionResult {
    /// Proposed capsule centre after penetration correction
    pub position: Vec3,
    /// Whether the capsule base touches terrain within tolerance
    pub is_grounded: bool,
    /// Highest terrain height found under the footprint, if any
    pub ground_height: Option<f32>,
}

impl CollisionResult {
    /// Free-fall result: no contact, position untouched.
    pub fn airborne(position: Vec3) -> Self {
        Self {
            position,
            is_grounded: false,
            ground_height: None,
        }
    }

    /// Apply the grounding rule for `capsule` at `proposed` against a known ground height.
    pub fn against_ground(
        capsule: &Capsule,
        proposed: Vec3,
        ground_height: Option<f32>,
        tolerance: f32,
    ) -> Self {
        let Some(ground) = ground_height else {
            return Self::airborne(proposed);
        };

        let base = proposed.y - capsule.half_height();
        if base <= ground + tolerance {
            Self {
                position: Vec3::new(proposed.x, capsule.resting_center_y(ground), proposed.z),
                is_grounded: true,
                ground_height: Some(ground),
            }
        } else {
            Self {
                position: proposed,
                is_grounded: false,
                ground_height: Some(ground),
            }
        }
    }

    /// Re-test a new proposed position against this result's ground height
    /// without probing the terrain again.
    pub fn reapplied(&self, capsule: &Capsule, proposed: Vec3, tolerance: f32) -> Self {
        Self::against_ground(capsule, proposed, self.ground_height, tolerance)
    }
}

/// Resolves capsule positions against terrain through a height cache.
#[derive(Debug, Clone)]
pub struct CapsuleCollisionResolver {
    cache: RaycastHeightCache,
    tolerance: f32,
    footprint_samples: usize,
    footprint_scale: f32,
    logging: bool,
}

impl CapsuleCollisionResolver {
    pub fn new(collision: &CollisionConfig, cache: &CacheConfig) -> Self {
        Self {
            cache: RaycastHeightCache::new(cache),
            tolerance: collision.ground_tolerance,
            footprint_samples: collision.footprint_samples,
            footprint_scale: collision.footprint_scale,
            logging: false,
        }
    }

    /// Resolve `capsule` moved to `proposed` against `terrain`.
    pub fn resolve(
        &mut self,
        capsule: &Capsule,
        proposed: Vec3,
        terrain: &TerrainSet,
        now: Duration,
    ) -> CollisionResult {
        let probe = capsule.translated_to(proposed);

        let mut ground = self.cache.sample(terrain, ground_plane(proposed), now);
        let mut hits = usize::from(ground.is_some());
        for point in probe.footprint_ring(self.footprint_samples, self.footprint_scale) {
            if let Some(height) = self.cache.sample(terrain, point, now) {
                hits += 1;
                ground = Some(ground.map_or(height, |g| g.max(height)));
            }
        }

        let result = CollisionResult::against_ground(&probe, proposed, ground, self.tolerance);

        if self.logging {
            tracing::debug!(
                position = ?proposed,
                corrected = ?result.position,
                ground = ?result.ground_height,
                grounded = result.is_grounded,
                hits,
                samples = self.footprint_samples + 1,
                "resolved capsule contact"
            );
        }

        result
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn footprint_samples(&self) -> usize {
        self.footprint_samples
    }

    pub fn set_logging(&mut self, enabled: bool) {
        self.logging = enabled;
    }

    pub fn logging(&self) -> bool {
        self.logging
    }

    pub fn cache(&self) -> &RaycastHeightCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cached heights, e.g. after a teleport.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
