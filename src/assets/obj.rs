//! OBJ model loading
//!
//! All meshes of a file are merged into one [`GeometryData`]. Missing normals
//! are computed; the first material's diffuse color tints the whole model.

use std::path::Path;

use crate::error::{KeepsakeError, Result};
use crate::gfx::geometry::{compute_vertex_normals, GeometryData};

/// Tint for models without a usable material
pub const DEFAULT_MODEL_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Geometry and tint of a loaded model
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub geometry: GeometryData,
    pub color: [f32; 3],
}

pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<LoadedModel> {
    let path = path.as_ref();
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )?;

    let materials = materials.unwrap_or_else(|err| {
        log::debug!("No usable MTL for {:?}: {}", path, err);
        Vec::new()
    });

    let mut geometry = GeometryData::new();
    for model in &models {
        let mesh = &model.mesh;
        let base = geometry.vertices.len() as u32;
        let vertex_count = mesh.positions.len() / 3;

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            compute_vertex_normals(&positions, &mesh.indices)
        };

        let tex_coords: Vec<[f32; 2]> = if mesh.texcoords.len() == vertex_count * 2 {
            mesh.texcoords.chunks_exact(2).map(|t| [t[0], 1.0 - t[1]]).collect()
        } else {
            vec![[0.0, 0.0]; vertex_count]
        };

        geometry.vertices.extend(positions);
        geometry.normals.extend(normals);
        geometry.tex_coords.extend(tex_coords);
        geometry
            .indices
            .extend(mesh.indices.iter().map(|index| base + index));
    }

    if geometry.indices.is_empty() {
        return Err(KeepsakeError::EmptyModel(path.display().to_string()));
    }

    let color = models
        .iter()
        .find_map(|model| model.mesh.material_id)
        .and_then(|id| materials.get(id))
        .and_then(|material| material.diffuse)
        .unwrap_or(DEFAULT_MODEL_COLOR);

    log::info!(
        "Loaded model {:?}: {} vertices, {} triangles",
        path,
        geometry.vertex_count(),
        geometry.triangle_count()
    );

    Ok(LoadedModel { geometry, color })
}
