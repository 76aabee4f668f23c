//! Wavefront OBJ loading.
//!
//! Each OBJ model becomes one [`Mesh`]. Materials from the companion MTL file
//! are registered in the caller's [`MaterialRegistry`] and diffuse maps in the
//! caller's [`TextureRegistry`].

use std::path::Path;

use glint_math::{Color, DVec2, DVec3};
use thiserror::Error;

use crate::mesh::Mesh;
use crate::registry::MaterialRegistry;
use crate::surface::Surface;
use crate::texture::TextureRegistry;

/// Errors that can occur during model loading.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("No geometry found in {0}")]
    Empty(String),

    #[error("Model '{model}' references vertex {index} but has {vertices} vertices")]
    InvalidIndex {
        model: String,
        index: u32,
        vertices: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// Load every model of an OBJ file.
pub fn load_obj(
    path: impl AsRef<Path>,
    materials: &mut MaterialRegistry,
    textures: &mut TextureRegistry,
) -> MeshResult<Vec<Mesh>> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let (models, obj_materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|source| MeshError::Load {
        path: display.clone(),
        source,
    })?;

    let obj_materials = obj_materials.unwrap_or_else(|e| {
        log::warn!("No usable materials for {}: {}", display, e);
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let material_ids: Vec<usize> = obj_materials
        .iter()
        .map(|m| register_material(m, base_dir, materials, textures))
        .collect();

    let mut meshes = Vec::with_capacity(models.len());
    for model in &models {
        let m = &model.mesh;
        if m.indices.is_empty() {
            log::warn!("Skipping empty model '{}' in {}", model.name, display);
            continue;
        }

        let positions: Vec<DVec3> = m
            .positions
            .chunks_exact(3)
            .map(|p| DVec3::new(p[0] as f64, p[1] as f64, p[2] as f64))
            .collect();

        let mut mesh = Mesh::new(positions, m.indices.clone());
        if let Some(index) = mesh.first_invalid_index() {
            return Err(MeshError::InvalidIndex {
                model: model.name.clone(),
                index,
                vertices: mesh.vertex_count(),
            });
        }

        if !m.texcoords.is_empty() {
            let uvs = m
                .texcoords
                .chunks_exact(2)
                .map(|t| DVec2::new(t[0] as f64, t[1] as f64))
                .collect();
            mesh = mesh.with_uvs(uvs);
        }

        if let Some(id) = m.material_id.and_then(|i| material_ids.get(i)) {
            mesh = mesh.with_material(*id);
        }

        log::debug!(
            "OBJ model '{}': {} vertices, {} triangles",
            model.name,
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        meshes.push(mesh);
    }

    if meshes.is_empty() {
        return Err(MeshError::Empty(display));
    }

    log::info!("Loaded {} model(s) from {}", meshes.len(), display);
    Ok(meshes)
}

/// Convert an MTL material and register it, returning its registry index.
fn register_material(
    material: &tobj::Material,
    base_dir: &Path,
    materials: &mut MaterialRegistry,
    textures: &mut TextureRegistry,
) -> usize {
    let rgb = |c: Option<[f32; 3]>, fallback: Color| {
        c.map_or(fallback, |c| Color::new(c[0] as f64, c[1] as f64, c[2] as f64))
    };

    let default = Surface::default();
    let mut surface = Surface::new(
        rgb(material.ambient, default.ka),
        rgb(material.diffuse, default.kd),
        rgb(material.specular, default.ks),
        material.shininess.map_or(default.ph, |s| s as f64),
    );

    if let Some(map) = &material.diffuse_texture {
        let full = base_dir.join(map);
        match textures.load(&full.to_string_lossy()) {
            Ok(id) => surface = surface.with_texture(0, id),
            Err(e) => log::warn!("Material '{}': {}", material.name, e),
        }
    }

    materials.add(material.name.clone(), surface)
}
