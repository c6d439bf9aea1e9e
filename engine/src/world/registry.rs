//! Terrain Mesh Registry
//!
//! Decides which scene meshes are solid, walkable terrain. Water, ocean and
//! dynamic meshes are excluded once, at classification time, so every probe
//! against the resulting [`TerrainSet`] can only ever land on solid ground.
//!
//! Classification is explicit: call [`TerrainRegistry::classify`] when the
//! scene's mesh roster changes, never per query. Classes are cached per mesh
//! id together with the tags they were computed from, so a reused id with new
//! tags is classified again.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::Serialize;

use super::mesh::{MeshId, MeshTags, SceneMesh};

/// Substrings marking a mesh as a water surface.
const WATER_MARKERS: [&str; 2] = ["ocean", "water"];

/// Substrings marking a mesh as moving geometry.
const DYNAMIC_MARKERS: [&str; 1] = ["dynamic"];

/// Substrings marking a mesh as explicit land.
const LAND_MARKERS: [&str; 3] = ["terrain", "land", "ground"];

/// Collision class of a scene mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MeshClass {
    /// Tagged as terrain/land/ground
    Land,
    /// Ocean or water surface, never collidable
    Water,
    /// Moving geometry, never collidable
    Dynamic,
    /// Untagged static geometry, collidable
    Other,
}

impl MeshClass {
    /// Whether meshes of this class belong in the terrain set.
    pub fn is_solid(self) -> bool {
        matches!(self, MeshClass::Land | MeshClass::Other)
    }
}

fn contains_marker(field: &str, markers: &[&str]) -> bool {
    let lowered = field.to_ascii_lowercase();
    markers.iter().any(|m| lowered.contains(m))
}

/// Classify a mesh from its tags.
///
/// Matching ignores ASCII case. Dynamic wins over water, water wins over land.
pub fn classify_tags(tags: &MeshTags) -> MeshClass {
    let has = |markers: &[&str]| tags.text_fields().any(|f| contains_marker(f, markers));

    if tags.dynamic || has(&DYNAMIC_MARKERS) {
        MeshClass::Dynamic
    } else if has(&WATER_MARKERS) {
        MeshClass::Water
    } else if has(&LAND_MARKERS) {
        MeshClass::Land
    } else {
        MeshClass::Other
    }
}

/// Immutable set of solid terrain meshes.
///
/// Each rebuild gets a new generation number so caches built against an
/// older set can notice and discard their contents.
#[derive(Debug, Clone, Default)]
pub struct TerrainSet {
    meshes: Vec<Arc<SceneMesh>>,
    generation: u64,
}

impl TerrainSet {
    /// A terrain set with no meshes (every probe misses).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.iter().any(|m| m.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneMesh> {
        self.meshes.iter().map(|m| m.as_ref())
    }

    /// Highest terrain surface hit by a downward ray from `origin`.
    pub fn ray_cast_down(&self, origin: Vec3, max_distance: f32) -> Option<f32> {
        self.meshes
            .iter()
            .filter_map(|mesh| mesh.ray_cast_down(origin, max_distance))
            .max_by(f32::total_cmp)
    }

    /// Terrain height at a ground-plane location, probing down from `probe_height`.
    pub fn height_at(&self, location: Vec2, probe_height: f32, max_distance: f32) -> Option<f32> {
        self.ray_cast_down(
            Vec3::new(location.x, probe_height, location.y),
            max_distance,
        )
    }
}

/// Counts from the most recent classification pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub generation: u64,
    pub included: usize,
    pub excluded: usize,
}

/// Class computed for a mesh, with the tags it was computed from.
#[derive(Debug, Clone)]
struct CachedClass {
    tags: MeshTags,
    class: MeshClass,
}

/// Builds and owns the current [`TerrainSet`].
#[derive(Debug, Default)]
pub struct TerrainRegistry {
    classes: HashMap<MeshId, CachedClass>,
    terrain: TerrainSet,
    summary: RegistrySummary,
}

impl TerrainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the terrain set from the full scene roster.
    ///
    /// Tags are inspected only for meshes that are new or whose tags changed.
    /// Ids missing from `meshes` are dropped from the class cache.
    pub fn classify(&mut self, meshes: &[Arc<SceneMesh>]) -> &TerrainSet {
        let mut previous = std::mem::take(&mut self.classes);
        let mut solid = Vec::with_capacity(meshes.len());
        for mesh in meshes {
            let cached = match previous.remove(&mesh.id()) {
                Some(cached) if cached.tags == *mesh.tags() => cached,
                _ => CachedClass {
                    tags: mesh.tags().clone(),
                    class: classify_tags(mesh.tags()),
                },
            };
            if cached.class.is_solid() {
                solid.push(Arc::clone(mesh));
            }
            self.classes.insert(mesh.id(), cached);
        }

        let generation = self.summary.generation + 1;
        self.summary = RegistrySummary {
            generation,
            included: solid.len(),
            excluded: meshes.len() - solid.len(),
        };
        self.terrain = TerrainSet {
            meshes: solid,
            generation,
        };

        if self.terrain.is_empty() {
            tracing::warn!(
                generation,
                roster = meshes.len(),
                "no collidable terrain meshes; player will stay airborne"
            );
        } else {
            tracing::info!(
                generation,
                included = self.summary.included,
                excluded = self.summary.excluded,
                "terrain set rebuilt"
            );
        }

        &self.terrain
    }

    pub fn terrain(&self) -> &TerrainSet {
        &self.terrain
    }

    pub fn summary(&self) -> RegistrySummary {
        self.summary
    }

    /// True when the last classification left no collidable meshes.
    pub fn is_empty_terrain(&self) -> bool {
        self.terrain.is_empty()
    }

    /// Cached class of a mesh id in the current roster.
    pub fn class_of(&self, id: MeshId) -> Option<MeshClass> {
        self.classes.get(&id).map(|cached| cached.class)
    }

    /// Number of mesh ids with a cached class.
    pub fn cached_classes(&self) -> usize {
        self.classes.len()
    }
}
