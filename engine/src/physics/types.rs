//! Physics type re-exports from glam
//!
//! Positions are `Vec3` with +Y up; ground-plane locations are `Vec2`
//! holding world (x, z).

pub use glam::{Vec2, Vec3};

/// Project a world position onto the ground plane as (x, z).
#[inline]
pub fn ground_plane(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Replace the horizontal components of `position`, keeping its height.
#[inline]
pub fn with_ground_plane(position: Vec3, location: Vec2) -> Vec3 {
    Vec3::new(location.x, position.y, location.y)
}
