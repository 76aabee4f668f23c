// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod camera;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use camera::Camera;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Linear RGB color, one `f64` per channel.
pub type Color = DVec3;

/// Geometric epsilon shared by every intersection test.
///
/// Hits closer than this to the ray origin are treated as self-intersections.
pub const THRESHOLD: f64 = 0.00001;
