//! Ray intersection primitives
//!
//! Narrow building blocks for the terrain probe: the slab test against an
//! axis-aligned box (broad phase per mesh) and the Moller-Trumbore test
//! against a single triangle (narrow phase).
//!
//! # Example
//!
//! ```ignore
//! use terra_stride_engine::physics::collision::{Aabb, ray_aabb_intersect};
//! use glam::Vec3;
//!
//! let origin = Vec3::new(0.0, 100.0, 0.0);
//! let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
//!
//! if let Some(t) = ray_aabb_intersect(origin, Vec3::NEG_Y, aabb.min, aabb.max) {
//!     println!("Hit top face at distance {}", t);
//! }
//! ```

use glam::Vec3;

/// Determinant below which a ray is treated as parallel to a triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Slack on barycentric bounds so rays through a shared edge hit one of the
/// two neighbouring triangles instead of slipping between them.
const EDGE_EPSILON: f32 = 1e-6;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point. Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Whether the XZ footprint of the box contains the point (inclusive).
    pub fn contains_xz(&self, x: f32, z: f32) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }
}

/// Performs ray-AABB intersection using the slab method.
///
/// The ray enters and exits each pair of axis-aligned planes; if the latest
/// entry comes before the earliest exit and the exit lies ahead of the origin,
/// the ray hits the box.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero direction components get a huge finite inverse so the
    // products below never produce NaN.
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() > 1e-10 { 1.0 / ray_dir.x } else { f32::MAX * ray_dir.x.signum() },
        if ray_dir.y.abs() > 1e-10 { 1.0 / ray_dir.y } else { f32::MAX * ray_dir.y.signum() },
        if ray_dir.z.abs() > 1e-10 { 1.0 / ray_dir.z } else { f32::MAX * ray_dir.z.signum() },
    );

    let t1 = (aabb_min.x - ray_origin.x) * inv_dir.x;
    let t2 = (aabb_max.x - ray_origin.x) * inv_dir.x;

    let mut t_min = t1.min(t2);
    let mut t_max = t1.max(t2);

    let t3 = (aabb_min.y - ray_origin.y) * inv_dir.y;
    let t4 = (aabb_max.y - ray_origin.y) * inv_dir.y;

    t_min = t_min.max(t3.min(t4));
    t_max = t_max.min(t3.max(t4));

    let t5 = (aabb_min.z - ray_origin.z) * inv_dir.z;
    let t6 = (aabb_max.z - ray_origin.z) * inv_dir.z;

    t_min = t_min.max(t5.min(t6));
    t_max = t_max.min(t5.max(t6));

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Where a ray crossed a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray
    pub distance: f32,
    /// Barycentric weight of the second vertex
    pub u: f32,
    /// Barycentric weight of the third vertex
    pub v: f32,
}

impl TriangleHit {
    /// Interpolate a per-vertex value at the hit point.
    ///
    /// Equal inputs come back unchanged, so flat ground reports its exact height.
    pub fn interpolate(&self, a: f32, b: f32, c: f32) -> f32 {
        if a == b && b == c {
            return a;
        }
        let u = self.u.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0 - u);
        (1.0 - u - v) * a + u * b + v * c
    }
}

/// Ray-triangle intersection (Moller-Trumbore).
///
/// Both faces count as hits; terrain meshes are not guaranteed to have a
/// consistent winding.
///
/// # Returns
///
/// The hit with distance in `[0, max_t]`, or `None`.
pub fn ray_triangle_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    max_t: f32,
) -> Option<TriangleHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let h = ray_dir.cross(e2);
    let det = e1.dot(h);

    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray_origin - v0;
    let u = s.dot(h) * inv_det;
    if !(-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&u) {
        return None;
    }

    let q = s.cross(e1);
    let v = ray_dir.dot(q) * inv_det;
    if v < -EDGE_EPSILON || u + v > 1.0 + EDGE_EPSILON {
        return None;
    }

    let t = e2.dot(q) * inv_det;
    (0.0..=max_t)
        .contains(&t)
        .then_some(TriangleHit { distance: t, u, v })
}
