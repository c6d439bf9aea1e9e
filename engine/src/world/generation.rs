//! Scene Mesh Generation
//!
//! Procedural static meshes for demo scenes and tests: grid heightfields,
//! flat ground, hexagonal platforms, water planes and ramps.

use glam::Vec3;

use super::mesh::{MeshId, MeshTags, SceneMesh};

/// Check whether a point lies inside a flat-topped hexagon of the given radius.
pub fn is_inside_hexagon(dx: f32, dz: f32, radius: f32) -> bool {
    let q = dx.abs();
    let r = dz.abs();
    let sqrt3 = 3.0_f32.sqrt();
    q <= radius && r <= radius * sqrt3 * 0.5 && sqrt3 * q + r <= radius * sqrt3
}

/// Grid heightfield centred on `center`, `2 * half_extent` wide on X and Z.
///
/// `height_at(x, z)` returns the world Y of each grid vertex.
pub fn generate_heightfield(
    id: MeshId,
    tags: MeshTags,
    center: Vec3,
    half_extent: f32,
    subdivisions: u32,
    height_at: impl Fn(f32, f32) -> f32,
) -> SceneMesh {
    let subdivisions = subdivisions.max(1);
    let grid_count = subdivisions + 1;
    let cell_size = (half_extent * 2.0) / (subdivisions as f32);

    let mut vertices = Vec::with_capacity((grid_count * grid_count) as usize);
    for gz in 0..grid_count {
        for gx in 0..grid_count {
            let x = center.x + (gx as f32) * cell_size - half_extent;
            let z = center.z + (gz as f32) * cell_size - half_extent;
            vertices.push(Vec3::new(x, height_at(x, z), z));
        }
    }

    let mut indices = Vec::with_capacity((subdivisions * subdivisions * 6) as usize);
    for gz in 0..subdivisions {
        for gx in 0..subdivisions {
            let i00 = gz * grid_count + gx;
            let i10 = gz * grid_count + (gx + 1);
            let i01 = (gz + 1) * grid_count + gx;
            let i11 = (gz + 1) * grid_count + (gx + 1);

            indices.extend_from_slice(&[i00, i01, i10, i10, i01, i11]);
        }
    }

    SceneMesh::new(id, tags, vertices, indices)
}

/// Flat square of ground at `center.y`.
pub fn generate_flat_ground(
    id: MeshId,
    tags: MeshTags,
    center: Vec3,
    half_extent: f32,
    subdivisions: u32,
) -> SceneMesh {
    generate_heightfield(id, tags, center, half_extent, subdivisions, |_, _| center.y)
}

/// Flat water surface tagged `ocean-surface`, clipped to a hexagon.
pub fn generate_water_plane(id: MeshId, center: Vec3, radius: f32) -> SceneMesh {
    let subdivisions = 32u32;
    let grid_count = subdivisions + 1;
    let cell_size = (radius * 2.0) / (subdivisions as f32);

    let mut vertices = Vec::with_capacity((grid_count * grid_count) as usize);
    for gz in 0..grid_count {
        for gx in 0..grid_count {
            let x = center.x + (gx as f32) * cell_size - radius;
            let z = center.z + (gz as f32) * cell_size - radius;
            vertices.push(Vec3::new(x, center.y, z));
        }
    }

    let mut indices = Vec::new();
    for gz in 0..subdivisions {
        for gx in 0..subdivisions {
            let i00 = gz * grid_count + gx;
            let i10 = gz * grid_count + (gx + 1);
            let i01 = (gz + 1) * grid_count + gx;
            let i11 = (gz + 1) * grid_count + (gx + 1);

            let dx = (gx as f32 + 0.5) * cell_size - radius;
            let dz = (gz as f32 + 0.5) * cell_size - radius;

            if is_inside_hexagon(dx, dz, radius) {
                indices.extend_from_slice(&[i00, i01, i10, i10, i01, i11]);
            }
        }
    }

    SceneMesh::new(id, MeshTags::kind("ocean-surface"), vertices, indices)
}

/// Flat hexagonal platform (triangle fan around the centre).
pub fn generate_hex_platform(id: MeshId, tags: MeshTags, center: Vec3, radius: f32) -> SceneMesh {
    let mut vertices = Vec::with_capacity(7);
    vertices.push(center);
    for i in 0..6 {
        let angle = (i as f32) * std::f32::consts::PI / 3.0;
        vertices.push(Vec3::new(
            center.x + radius * angle.cos(),
            center.y,
            center.z + radius * angle.sin(),
        ));
    }

    let mut indices = Vec::with_capacity(18);
    for i in 0..6u32 {
        let next = (i + 1) % 6;
        indices.extend_from_slice(&[0, i + 1, next + 1]);
    }

    SceneMesh::new(id, tags, vertices, indices)
}

/// Straight ramp rising along +X from `start`, `width` wide on Z.
pub fn generate_ramp(
    id: MeshId,
    tags: MeshTags,
    start: Vec3,
    length: f32,
    width: f32,
    rise: f32,
) -> SceneMesh {
    let half_width = width * 0.5;
    let end = start + Vec3::new(length, rise, 0.0);
    let vertices = vec![
        Vec3::new(start.x, start.y, start.z - half_width),
        Vec3::new(end.x, end.y, start.z - half_width),
        Vec3::new(end.x, end.y, start.z + half_width),
        Vec3::new(start.x, start.y, start.z + half_width),
    ];
    SceneMesh::new(id, tags, vertices, vec![0, 1, 2, 0, 2, 3])
}
