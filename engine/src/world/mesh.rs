//! Scene Meshes
//!
//! Static triangle meshes handed over by the scene builder, with the
//! metadata tags used to decide whether they count as walkable terrain.
//! Geometry is stored in world space and never changes after construction.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::collision::{Aabb, ray_aabb_intersect, ray_triangle_intersect};

/// Stable identifier of a scene mesh. The registry caches classification per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Type/identifier metadata attached to a scene mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshTags {
    /// Free-form type tag, e.g. "terrain", "ocean-surface"
    pub kind: Option<String>,
    /// Identifier or display name, e.g. "north_island", "WaterPlane"
    pub name: Option<String>,
    /// Set for meshes that move at runtime
    pub dynamic: bool,
}

impl MeshTags {
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    /// All string fields that carry classification hints.
    pub fn text_fields(&self) -> impl Iterator<Item = &str> {
        self.kind.as_deref().into_iter().chain(self.name.as_deref())
    }
}

/// A static triangle mesh from the scene roster.
#[derive(Debug, Clone)]
pub struct SceneMesh {
    id: MeshId,
    tags: MeshTags,
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl SceneMesh {
    /// Build a mesh from world-space vertices and a triangle index list.
    ///
    /// Trailing indices that do not form a full triangle are ignored, as are
    /// triangles referencing vertices out of range.
    pub fn new(id: MeshId, tags: MeshTags, vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(&vertices);
        Self {
            id,
            tags,
            vertices,
            indices,
            bounds,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn tags(&self) -> &MeshTags {
        &self.tags
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate the valid triangles of this mesh.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                *self.vertices.get(tri[0] as usize)?,
                *self.vertices.get(tri[1] as usize)?,
                *self.vertices.get(tri[2] as usize)?,
            ])
        })
    }

    /// Cast a ray from `origin` and return the distance to the nearest hit.
    pub fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let bounds = self.bounds?;
        let entry = ray_aabb_intersect(origin, direction, bounds.min, bounds.max)?;
        if entry > max_distance {
            return None;
        }

        self.triangles()
            .filter_map(|[v0, v1, v2]| {
                ray_triangle_intersect(origin, direction, v0, v1, v2, max_distance)
            })
            .map(|hit| hit.distance)
            .min_by(f32::total_cmp)
    }

    /// Cast straight down from `origin`; returns the world Y of the topmost hit.
    ///
    /// Heights are interpolated from the hit triangle's vertices rather than
    /// subtracted from the probe origin, so a tall probe costs no precision.
    pub fn ray_cast_down(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        let bounds = self.bounds?;
        if !bounds.contains_xz(origin.x, origin.z) {
            return None;
        }
        ray_aabb_intersect(origin, Vec3::NEG_Y, bounds.min, bounds.max)
            .filter(|entry| *entry <= max_distance)?;

        self.triangles()
            .filter_map(|[v0, v1, v2]| {
                ray_triangle_intersect(origin, Vec3::NEG_Y, v0, v1, v2, max_distance)
                    .map(|hit| hit.interpolate(v0.y, v1.y, v2.y))
            })
            .max_by(f32::total_cmp)
    }
}
