//! World Module
//!
//! Scene geometry as seen by collision: static meshes from the scene roster,
//! the registry that filters them down to walkable terrain, and procedural
//! generators for demo scenes and tests.

pub mod generation;
pub mod mesh;
pub mod registry;

pub use generation::{
    generate_flat_ground, generate_heightfield, generate_hex_platform, generate_ramp,
    generate_water_plane, is_inside_hexagon,
};
pub use mesh::{MeshId, MeshTags, SceneMesh};
pub use registry::{MeshClass, RegistrySummary, TerrainRegistry, TerrainSet, classify_tags};
