//! Physics module for Terra Stride
//!
//! Capsule-versus-static-terrain contact. There are no rigid bodies and no
//! constraint solving here: one capsule, a set of static triangle meshes, and
//! the machinery to keep downward probing cheap.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, seconds for time. Velocities in u/s, accelerations
//! in u/s². +Y is up; the ground plane is XZ.
//!
//! # Submodules
//!
//! - [`types`] - Math types re-exported from glam, ground-plane helpers
//! - [`collision`] - Ray-AABB and ray-triangle intersection
//! - [`capsule`] - The player's collision volume
//! - [`height_cache`] - TTL cache over downward terrain probes
//! - [`resolver`] - Ground sampling and penetration correction
//! - [`scheduler`] - Throttles how often the resolver runs

pub mod capsule;
pub mod collision;
pub mod height_cache;
pub mod resolver;
pub mod scheduler;
pub mod types;

pub use capsule::Capsule;
pub use collision::{Aabb, TriangleHit, ray_aabb_intersect, ray_triangle_intersect};
pub use height_cache::{CacheStats, CellKey, HeightSample, RaycastHeightCache};
pub use resolver::{CapsuleCollisionResolver, CollisionResult};
pub use scheduler::{CollisionScheduler, SchedulerStats};
pub use types::{Vec2, Vec3, ground_plane, with_ground_plane};
