//! Glint Core - renderer-agnostic scene data.
//!
//! This crate provides:
//!
//! - **Surfaces**: `Coef`, `Surface` and the named surface library
//! - **Registries**: explicit `MaterialRegistry` and `TextureRegistry` values
//! - **Geometry input**: the `Mesh` container and Wavefront OBJ loading
//! - **Scene files**: the JSON `SceneDescription`
//!
//! # Example
//!
//! ```ignore
//! use glint_core::SceneDescription;
//!
//! let scene = SceneDescription::from_file("scene.json")?;
//! println!("{} shapes, {} lights", scene.shapes.len(), scene.lights.len());
//! ```

pub mod mesh;
pub mod obj;
pub mod registry;
pub mod scene;
pub mod surface;
pub mod texture;

// Re-export commonly used types
pub use mesh::{Mesh, TriangleVertices};
pub use obj::{load_obj, MeshError, MeshResult};
pub use registry::MaterialRegistry;
pub use scene::{
    CameraDesc, FogDesc, GeometryDesc, LightDesc, SceneDescription, SceneError, SceneResult,
    ShapeDesc, SurfaceDesc, TransformDesc,
};
pub use surface::{Coef, Surface, SURFACE_LIBRARY, TEXTURE_SLOTS};
pub use texture::{Texture, TextureError, TextureRegistry, TextureResult};
