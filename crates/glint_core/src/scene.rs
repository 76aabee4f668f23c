//! Scene description format.
//!
//! A scene file is JSON. It names the camera, image size, global scene
//! parameters, lights, textures and a tree of shapes. The description is
//! plain data: turning it into renderable shapes is the renderer's job.
//!
//! ```json
//! {
//!   "camera": { "location": [3, 3, 3], "look_at": [0, 0, 0] },
//!   "lights": [{ "type": "point", "position": [3.5, 5, 5] }],
//!   "shapes": [
//!     { "type": "sphere", "radius": 1, "surface": "Ruby" },
//!     { "type": "subtrack",
//!       "a": { "type": "box", "min": [-1, -1, -1], "max": [1, 1, 1] },
//!       "b": { "type": "sphere", "radius": 1.3 } }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use glint_math::{Camera, Color, DMat4, DQuat, DVec2, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::obj::MeshError;
use crate::surface::Surface;
use crate::texture::TextureError;

/// Errors that can occur while reading or resolving a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to read scene {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown surface '{0}'")]
    UnknownSurface(String),

    #[error("Texture #{index} referenced but only {count} textures are declared")]
    UnknownTexture { index: usize, count: usize },

    #[error("Invalid {shape}: {reason}")]
    InvalidGeometry { shape: &'static str, reason: String },

    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub type SceneResult<T> = Result<T, SceneError>;

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_background() -> [f64; 3] {
    [0.3, 0.47, 0.8]
}

fn default_max_rec_level() -> u32 {
    5
}

fn default_white() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_one() -> f64 {
    1.0
}

fn default_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

/// Top level of a scene file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDesc,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub ambient: [f64; 3],

    #[serde(default = "default_background")]
    pub background: [f64; 3],

    #[serde(default)]
    pub fog: Option<FogDesc>,

    #[serde(default = "default_max_rec_level")]
    pub max_rec_level: u32,

    /// Texture file paths; surfaces refer to them by position.
    #[serde(default)]
    pub textures: Vec<String>,

    #[serde(default)]
    pub lights: Vec<LightDesc>,

    #[serde(default)]
    pub shapes: Vec<ShapeDesc>,

    /// Directory relative paths are resolved against (set by [`Self::from_file`]).
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            camera: CameraDesc::default(),
            width: default_width(),
            height: default_height(),
            ambient: [0.0; 3],
            background: default_background(),
            fog: None,
            max_rec_level: default_max_rec_level(),
            textures: Vec::new(),
            lights: Vec::new(),
            shapes: Vec::new(),
            base_dir: None,
        }
    }
}

impl SceneDescription {
    /// Parse and validate a description from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let description: Self = serde_json::from_str(json)?;
        description.validate()?;
        Ok(description)
    }

    /// Read, parse and validate a scene file.
    pub fn from_file(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut description = Self::from_json_str(&json)?;
        description.base_dir = path.parent().map(Path::to_path_buf);

        log::info!(
            "Loaded scene {}: {} shapes, {} lights, {} textures",
            path.display(),
            description.shapes.len(),
            description.lights.len(),
            description.textures.len()
        );
        Ok(description)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value the renderer cannot recover from.
    pub fn validate(&self) -> SceneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidImageSize {
                width: self.width,
                height: self.height,
            });
        }
        for shape in &self.shapes {
            shape.validate(self.textures.len())?;
        }
        Ok(())
    }

    /// Resolve a path from the file against the scene directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match &self.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// Camera for this description's image size.
    pub fn camera(&self) -> Camera {
        self.camera.build(self.width, self.height)
    }
}

/// Pinhole camera placement. Missing fields take their defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDesc {
    pub location: [f64; 3],
    pub look_at: [f64; 3],
    pub up: [f64; 3],
    pub proj_size: f64,
    pub proj_dist: f64,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            location: [3.0, 3.0, 3.0],
            look_at: [0.0; 3],
            up: [0.0, 1.0, 0.0],
            proj_size: 0.1,
            proj_dist: 0.1,
        }
    }
}

impl CameraDesc {
    pub fn build(&self, width: u32, height: u32) -> Camera {
        Camera::new()
            .with_resolution(width, height)
            .with_projection(self.proj_size, self.proj_dist)
            .with_position(self.location.into(), self.look_at.into(), self.up.into())
    }
}

/// Fog parameters. Stored with the scene, not applied by the shader.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FogDesc {
    #[serde(default)]
    pub color: [f64; 3],
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
}

/// A light source.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightDesc {
    Point {
        position: [f64; 3],
        #[serde(default = "default_white")]
        color: [f64; 3],
        /// Constant attenuation term
        #[serde(default = "default_one")]
        constant: f64,
        #[serde(default)]
        linear: f64,
        #[serde(default)]
        quadratic: f64,
    },
}

/// Either a library name or explicit coefficients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SurfaceDesc {
    Named(String),
    Explicit {
        ka: [f64; 3],
        kd: [f64; 3],
        ks: [f64; 3],
        ph: f64,
        #[serde(default)]
        kr: Option<[f64; 3]>,
        #[serde(default)]
        kt: Option<[f64; 3]>,
        /// Index into the scene's texture list, bound to slot 0.
        #[serde(default)]
        texture: Option<usize>,
    },
}

impl SurfaceDesc {
    /// Build the surface. `texture_ids` maps declared textures to registry ids.
    pub fn to_surface(&self, texture_ids: &[usize]) -> SceneResult<Surface> {
        match self {
            SurfaceDesc::Named(name) => {
                Surface::from_library(name).ok_or_else(|| SceneError::UnknownSurface(name.clone()))
            }
            SurfaceDesc::Explicit {
                ka,
                kd,
                ks,
                ph,
                kr,
                kt,
                texture,
            } => {
                let mut surface = Surface::new((*ka).into(), (*kd).into(), (*ks).into(), *ph);
                if let Some(kr) = kr {
                    surface = surface.with_reflection(Color::from(*kr));
                }
                if let Some(kt) = kt {
                    surface = surface.with_transmission(Color::from(*kt));
                }
                if let Some(index) = texture {
                    let id = texture_ids.get(*index).ok_or(SceneError::UnknownTexture {
                        index: *index,
                        count: texture_ids.len(),
                    })?;
                    surface = surface.with_texture(0, *id);
                }
                Ok(surface)
            }
        }
    }
}

/// Translation, Euler rotation (degrees, XYZ order) and scale.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformDesc {
    #[serde(default)]
    pub translate: [f64; 3],
    #[serde(default)]
    pub rotate_degrees: [f64; 3],
    #[serde(default = "default_scale")]
    pub scale: [f64; 3],
}

impl Default for TransformDesc {
    fn default() -> Self {
        Self {
            translate: [0.0; 3],
            rotate_degrees: [0.0; 3],
            scale: default_scale(),
        }
    }
}

impl TransformDesc {
    /// Object-to-world matrix: scale, then rotate, then translate.
    pub fn to_matrix(&self) -> DMat4 {
        let [rx, ry, rz] = self.rotate_degrees.map(f64::to_radians);
        DMat4::from_scale_rotation_translation(
            DVec3::from(self.scale),
            DQuat::from_euler(EulerRot::XYZ, rx, ry, rz),
            DVec3::from(self.translate),
        )
    }
}

/// One node of the shape tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShapeDesc {
    #[serde(flatten)]
    pub geometry: GeometryDesc,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<SurfaceDesc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformDesc>,

    /// Use the shape's procedural colour instead of the flat diffuse.
    #[serde(default)]
    pub mode: bool,
}

impl ShapeDesc {
    /// Wrap a geometry with default attributes.
    pub fn new(geometry: GeometryDesc) -> Self {
        Self {
            geometry,
            surface: None,
            transform: None,
            mode: false,
        }
    }

    pub fn with_surface(mut self, surface: SurfaceDesc) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn with_transform(mut self, transform: TransformDesc) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_mode(mut self, mode: bool) -> Self {
        self.mode = mode;
        self
    }

    /// Object-to-world matrix of this node.
    pub fn matrix(&self) -> DMat4 {
        self.transform
            .as_ref()
            .map_or(DMat4::IDENTITY, TransformDesc::to_matrix)
    }

    fn validate(&self, texture_count: usize) -> SceneResult<()> {
        if let Some(SurfaceDesc::Explicit {
            texture: Some(index),
            ..
        }) = &self.surface
        {
            if *index >= texture_count {
                return Err(SceneError::UnknownTexture {
                    index: *index,
                    count: texture_count,
                });
            }
        }
        if let Some(SurfaceDesc::Named(name)) = &self.surface {
            if Surface::from_library(name).is_none() {
                return Err(SceneError::UnknownSurface(name.clone()));
            }
        }
        self.geometry.validate(texture_count)
    }
}

/// Geometry of a shape node, tagged by `"type"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryDesc {
    Plane {
        normal: [f64; 3],
        point: [f64; 3],
    },
    Sphere {
        #[serde(default)]
        center: [f64; 3],
        radius: f64,
    },
    Box {
        min: [f64; 3],
        max: [f64; 3],
    },
    Triangle {
        vertices: [[f64; 3]; 3],
        #[serde(default)]
        uvs: Option<[[f64; 2]; 3]>,
    },
    Torus {
        major_radius: f64,
        minor_radius: f64,
    },
    Mesh {
        path: String,
    },
    Union {
        a: Box<ShapeDesc>,
        b: Box<ShapeDesc>,
    },
    Intersection {
        a: Box<ShapeDesc>,
        b: Box<ShapeDesc>,
    },
    Subtrack {
        a: Box<ShapeDesc>,
        b: Box<ShapeDesc>,
    },
    Clip {
        a: Box<ShapeDesc>,
        b: Box<ShapeDesc>,
    },
    Bound {
        bound: Box<ShapeDesc>,
        shape: Box<ShapeDesc>,
    },
}

impl GeometryDesc {
    /// Short name used in messages.
    pub fn kind(&self) -> &'static str {
        match self {
            GeometryDesc::Plane { .. } => "plane",
            GeometryDesc::Sphere { .. } => "sphere",
            GeometryDesc::Box { .. } => "box",
            GeometryDesc::Triangle { .. } => "triangle",
            GeometryDesc::Torus { .. } => "torus",
            GeometryDesc::Mesh { .. } => "mesh",
            GeometryDesc::Union { .. } => "union",
            GeometryDesc::Intersection { .. } => "intersection",
            GeometryDesc::Subtrack { .. } => "subtrack",
            GeometryDesc::Clip { .. } => "clip",
            GeometryDesc::Bound { .. } => "bound",
        }
    }

    fn validate(&self, texture_count: usize) -> SceneResult<()> {
        let invalid = |reason: &str| SceneError::InvalidGeometry {
            shape: self.kind(),
            reason: reason.to_string(),
        };

        match self {
            GeometryDesc::Plane { normal, .. } => {
                if DVec3::from(*normal).length_squared() == 0.0 {
                    return Err(invalid("normal must be non-zero"));
                }
            }
            GeometryDesc::Sphere { radius, .. } => {
                if *radius <= 0.0 {
                    return Err(invalid("radius must be positive"));
                }
            }
            GeometryDesc::Box { min, max } => {
                if min.iter().zip(max).any(|(lo, hi)| lo > hi) {
                    return Err(invalid("min must not exceed max"));
                }
            }
            GeometryDesc::Triangle { vertices, .. } => {
                let [a, b, c] = vertices.map(DVec3::from);
                if (b - a).cross(c - a).length_squared() == 0.0 {
                    return Err(invalid("vertices are collinear"));
                }
            }
            GeometryDesc::Torus {
                major_radius,
                minor_radius,
            } => {
                if *major_radius <= 0.0 || *minor_radius <= 0.0 {
                    return Err(invalid("radii must be positive"));
                }
            }
            GeometryDesc::Mesh { path } => {
                if path.is_empty() {
                    return Err(invalid("path is empty"));
                }
            }
            GeometryDesc::Union { a, b }
            | GeometryDesc::Intersection { a, b }
            | GeometryDesc::Subtrack { a, b }
            | GeometryDesc::Clip { a, b } => {
                a.validate(texture_count)?;
                b.validate(texture_count)?;
            }
            GeometryDesc::Bound { bound, shape } => {
                bound.validate(texture_count)?;
                shape.validate(texture_count)?;
            }
        }
        Ok(())
    }
}

/// Texture coordinates of a triangle description, zero when absent.
pub fn triangle_uvs(uvs: &Option<[[f64; 2]; 3]>) -> [DVec2; 3] {
    uvs.map_or([DVec2::ZERO; 3], |uvs| uvs.map(DVec2::from))
}
