//! HitRecord for ray-shape intersection.

use crate::shape::Shape;
use crate::triangle::Polygon;
use glint_math::{DVec3, THRESHOLD};

/// Parameter value of a record that holds no hit.
pub const MISS_T: f64 = -1.0;

/// How the ray crosses the surface at the hit point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    /// Ray direction opposes the outward normal.
    Enter,
    /// Tangential contact.
    Stay,
    /// Ray direction follows the outward normal.
    Leave,
}

impl HitKind {
    /// Classify a crossing from the ray direction and the outward normal.
    pub fn from_facing(direction: DVec3, normal: DVec3) -> Self {
        let d = direction.dot(normal);
        if d.abs() < THRESHOLD {
            HitKind::Stay
        } else if d < 0.0 {
            HitKind::Enter
        } else {
            HitKind::Leave
        }
    }

    /// The same crossing seen from the other side of the surface.
    pub fn flipped(self) -> Self {
        match self {
            HitKind::Enter => HitKind::Leave,
            HitKind::Leave => HitKind::Enter,
            HitKind::Stay => HitKind::Stay,
        }
    }
}

/// Record of a ray-shape intersection.
///
/// Point and normal are in the space of whoever asked: shapes fill them in
/// their local space, and callers that applied a transform carry them back.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Ray parameter of the hit, [`MISS_T`] when there is none
    pub t: f64,
    /// Point of intersection
    pub p: DVec3,
    /// Outward surface normal (not necessarily unit length)
    pub n: DVec3,
    /// Leaf shape that produced the hit
    pub shape: Option<&'a dyn Shape>,
    pub kind: HitKind,
    /// Material registry index overriding the shape's own surface
    pub material: Option<usize>,
    /// Scratch slots for shape-specific data
    pub ints: [i64; 2],
    pub doubles: [f64; 2],
    pub vecs: [DVec3; 2],
    /// Mesh triangle that was hit
    pub polygon: Option<&'a Polygon>,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            t: MISS_T,
            p: DVec3::ZERO,
            n: DVec3::ZERO,
            shape: None,
            kind: HitKind::Enter,
            material: None,
            ints: [0; 2],
            doubles: [0.0; 2],
            vecs: [DVec3::ZERO; 2],
            polygon: None,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Start a record for a hit at `t` on `shape`.
    pub fn at(shape: &'a dyn Shape, t: f64) -> Self {
        Self {
            t,
            shape: Some(shape),
            material: shape.attributes().material,
            ..Self::default()
        }
    }

    /// Whether the record holds a hit.
    pub fn is_hit(&self) -> bool {
        self.shape.is_some() && self.t >= 0.0
    }

    /// Set point, normal and crossing kind from a local-space ray.
    pub fn set_geometry(&mut self, p: DVec3, n: DVec3, direction: DVec3) {
        self.p = p;
        self.n = n;
        self.kind = HitKind::from_facing(direction, n);
    }
}

impl std::fmt::Debug for HitRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRecord")
            .field("t", &self.t)
            .field("p", &self.p)
            .field("n", &self.n)
            .field("shape", &self.shape.map(|s| s.name()))
            .field("kind", &self.kind)
            .field("material", &self.material)
            .finish()
    }
}

/// Index of the nearest hit in a list.
pub fn nearest(hits: &[HitRecord]) -> Option<usize> {
    hits.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.t.total_cmp(&b.t))
        .map(|(i, _)| i)
}
