//! Raycast Height Cache
//!
//! Wraps the downward terrain probe with a short-lived cache keyed by a
//! quantized ground-plane cell. Under normal movement most footprint samples
//! land in cells probed a few ticks earlier, so the cache absorbs the bulk of
//! the raycast volume.
//!
//! # Invariants
//!
//! - A sample older than the TTL is never returned; it counts as a miss.
//! - At most `capacity` samples are held. On overflow, expired samples are
//!   purged first, then the oldest remaining sample is evicted.
//! - Samples are taken at the cell centre, so a cached height depends only
//!   on the cell key and the terrain generation.
//! - A new terrain generation discards every sample.

use std::collections::HashMap;
use std::time::Duration;

use glam::{Vec2, Vec3};
use serde::Serialize;

use crate::config::CacheConfig;
use crate::world::TerrainSet;

/// Quantized ground-plane location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: i32,
    pub z: i32,
}

/// One cached probe result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSample {
    pub key: CellKey,
    /// Terrain height, or `None` when nothing solid lies beneath the cell
    pub height: Option<f32>,
    /// Simulation time the probe ran
    pub timestamp: Duration,
}

/// Cache counters for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Samples answered from the cache
    pub hits: u64,
    /// Geometric probes performed (every miss runs exactly one)
    pub queries: u64,
    /// Misses caused by an expired sample
    pub expired: u64,
    /// Samples dropped to stay within capacity
    pub evicted: u64,
}

impl CacheStats {
    /// Fraction of samples served without a probe.
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.queries;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }
}

/// Time-boxed cache over downward terrain probes.
#[derive(Debug, Clone)]
pub struct RaycastHeightCache {
    entries: HashMap<CellKey, HeightSample>,
    ttl: Duration,
    resolution: f32,
    capacity: usize,
    probe_height: f32,
    max_probe_distance: f32,
    generation: u64,
    stats: CacheStats,
}

impl RaycastHeightCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::with_capacity(config.capacity.min(4096)),
            ttl: config.ttl(),
            resolution: config.resolution,
            capacity: config.capacity.max(1),
            probe_height: config.probe_height,
            max_probe_distance: config.max_probe_distance,
            generation: 0,
            stats: CacheStats::default(),
        }
    }

    /// Cell containing a ground-plane location.
    pub fn key_for(&self, location: Vec2) -> CellKey {
        CellKey {
            x: (location.x / self.resolution).round() as i32,
            z: (location.y / self.resolution).round() as i32,
        }
    }

    /// Ground-plane centre of a cell.
    pub fn cell_center(&self, key: CellKey) -> Vec2 {
        Vec2::new(key.x as f32 * self.resolution, key.z as f32 * self.resolution)
    }

    /// Terrain height beneath `location`, or `None` when no terrain is found.
    pub fn sample(&mut self, terrain: &TerrainSet, location: Vec2, now: Duration) -> Option<f32> {
        if terrain.generation() != self.generation {
            self.entries.clear();
            self.generation = terrain.generation();
        }

        let key = self.key_for(location);
        if let Some(sample) = self.entries.get(&key) {
            if now.saturating_sub(sample.timestamp) < self.ttl {
                self.stats.hits += 1;
                return sample.height;
            }
            self.stats.expired += 1;
        }

        let height = self.probe(terrain, key);
        self.store(HeightSample {
            key,
            height,
            timestamp: now,
        });
        height
    }

    fn probe(&mut self, terrain: &TerrainSet, key: CellKey) -> Option<f32> {
        self.stats.queries += 1;
        let center = self.cell_center(key);
        terrain.ray_cast_down(
            Vec3::new(center.x, self.probe_height, center.y),
            self.max_probe_distance,
        )
    }

    fn store(&mut self, sample: HeightSample) {
        if !self.entries.contains_key(&sample.key) && self.entries.len() >= self.capacity {
            self.make_room(sample.timestamp);
        }
        self.entries.insert(sample.key, sample);
    }

    fn make_room(&mut self, now: Duration) {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, s| now.saturating_sub(s.timestamp) < ttl);
        self.stats.evicted += (before - self.entries.len()) as u64;

        if self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .values()
                .min_by_key(|s| s.timestamp)
                .map(|s| s.key);
            if let Some(key) = oldest {
                self.entries.remove(&key);
                self.stats.evicted += 1;
            }
        }
    }

    /// Drop every cached sample.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::world::{MeshId, MeshTags, TerrainRegistry, generate_flat_ground};

    fn flat_terrain(registry: &mut TerrainRegistry, y: f32) -> TerrainSet {
        let ground = Arc::new(generate_flat_ground(
            MeshId(1),
            MeshTags::kind("terrain"),
            Vec3::new(0.0, y, 0.0),
            50.0,
            4,
        ));
        registry.classify(&[ground]).clone()
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_hit_within_ttl_skips_probe() {
        let mut registry = TerrainRegistry::new();
        let terrain = flat_terrain(&mut registry, 1.5);
        let mut cache = RaycastHeightCache::new(&CacheConfig::default());

        let first = cache.sample(&terrain, Vec2::new(2.0, 3.0), ms(0));
        let second = cache.sample(&terrain, Vec2::new(2.0, 3.0), ms(50));

        assert_eq!(first, second);
        assert!((first.unwrap() - 1.5).abs() < 1e-4);
        assert_eq!(cache.stats().queries, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_nearby_locations_share_a_cell() {
        let mut registry = TerrainRegistry::new();
        let terrain = flat_terrain(&mut registry, 0.0);
        let mut cache = RaycastHeightCache::new(&CacheConfig::default());

        cache.sample(&terrain, Vec2::new(2.001, 3.002), ms(0));
        cache.sample(&terrain, Vec2::new(1.999, 2.998), ms(1));
        assert_eq!(cache.stats().queries, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_sample_is_a_miss() {
        let mut registry = TerrainRegistry::new();
        let terrain = flat_terrain(&mut registry, 0.0);
        let mut cache = RaycastHeightCache::new(&CacheConfig::default());

        cache.sample(&terrain, Vec2::ZERO, ms(0));
        cache.sample(&terrain, Vec2::ZERO, ms(100));

        let stats = cache.stats();
        assert_eq!(stats.queries, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.hits, 0);
        // The newer sample supersedes the old one
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_misses_are_cached_too() {
        let terrain = TerrainSet::empty();
        let mut cache = RaycastHeightCache::new(&CacheConfig::default());

        assert!(cache.sample(&terrain, Vec2::ZERO, ms(0)).is_none());
        assert!(cache.sample(&terrain, Vec2::ZERO, ms(10)).is_none());
        assert_eq!(cache.stats().queries, 1);
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut registry = TerrainRegistry::new();
        let terrain = flat_terrain(&mut registry, 0.0);
        let config = CacheConfig {
            capacity: 8,
            ..CacheConfig::default()
        };
        let mut cache = RaycastHeightCache::new(&config);

        for i in 0..32 {
            cache.sample(&terrain, Vec2::new(i as f32, 0.0), ms(i));
            assert!(cache.len() <= 8);
        }
        assert_eq!(cache.len(), 8);
        assert_eq!(cache.stats().evicted, 24);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut registry = TerrainRegistry::new();
        let terrain = flat_terrain(&mut registry, 0.0);
        let config = CacheConfig {
            capacity: 2,
            ..CacheConfig::default()
        };
        let mut cache = RaycastHeightCache::new(&config);

        cache.sample(&terrain, Vec2::new(0.0, 0.0), ms(0));
        cache.sample(&terrain, Vec2::new(1.0, 0.0), ms(1));
        cache.sample(&terrain, Vec2::new(2.0, 0.0), ms(2));

        // Cell at x=0 was the oldest and is gone; x=1 is still cached
        cache.sample(&terrain, Vec2::new(1.0, 0.0), ms(3));
        assert_eq!(cache.stats().hits, 1);
        cache.sample(&terrain, Vec2::new(0.0, 0.0), ms(4));
        assert_eq!(cache.stats().queries, 4);
    }

    #[test]
    fn test_new_terrain_generation_clears_cache() {
        let mut registry = TerrainRegistry::new();
        let low = flat_terrain(&mut registry, 0.0);
        let mut cache = RaycastHeightCache::new(&CacheConfig::default());
        assert!((cache.sample(&low, Vec2::ZERO, ms(0)).unwrap()).abs() < 1e-4);

        let high = flat_terrain(&mut registry, 4.0);
        let y = cache.sample(&high, Vec2::ZERO, ms(1)).unwrap();
        assert!((y - 4.0).abs() < 1e-4, "stale height {} served after rebuild", y);
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 8,
            queries: 2,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.8).abs() < 1e-6);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
