//! Glint Renderer - CPU Whitted ray tracing.
//!
//! Shapes are intersected analytically in their own local space and
//! combined with CSG operators; triangle meshes sit in a median-split
//! partition tree. Shading is classic Whitted: ambient, diffuse, Phong
//! specular, hard shadows and recursive mirror reflection. Frames are
//! rendered by a pool of workers claiming rows from a shared counter.
//!
//! # Example
//!
//! ```ignore
//! use glint_renderer::{demo_camera, demo_scene, render, FrameBuffer, RenderConfig, RenderControl};
//!
//! let scene = demo_scene();
//! let camera = demo_camera(640, 480);
//! let mut frame = FrameBuffer::new(640, 480);
//! let control = RenderControl::new();
//! render(&scene, &camera, &mut frame, &control, &RenderConfig::default())?;
//! ```

mod axis_box;
mod control;
pub mod csg;
mod framebuffer;
mod hit;
mod light;
mod loader;
mod mesh;
mod mesh_tree;
mod plane;
mod renderer;
mod scene;
mod shading;
mod shape;
mod sphere;
mod torus;
mod triangle;

pub use axis_box::AxisBox;
pub use control::RenderControl;
pub use csg::{Bound, Clip, Intersection, Subtrack, Union};
pub use framebuffer::{to_rgb, FrameBuffer};
pub use hit::{nearest, HitKind, HitRecord, MISS_T};
pub use light::{Light, LightSample, PointLight};
pub use loader::{build_scene, demo_camera, demo_scene};
pub use mesh::MeshShape;
pub use mesh_tree::{MeshNode, TreeHit, TreeStats, MAX_TREE_DEPTH};
pub use plane::{checker, tile_coords, Plane};
pub use renderer::{
    render, render_pixel, RenderConfig, RenderError, RenderResult, RenderStats,
};
pub use scene::{Fog, Media, Scene, DEFAULT_BACKGROUND, DEFAULT_MAX_REC_LEVEL};
pub use shading::{Tracer, COLOR_THRESHOLD};
pub use shape::{
    all_intersect_world, intersect_world, is_inside_world, is_intersect_world, Shape,
    ShapeAttributes, ShapeExt, Transform,
};
pub use sphere::Sphere;
pub use torus::Torus;
pub use triangle::{Polygon, Triangle};

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Camera, Color, Ray, THRESHOLD};
