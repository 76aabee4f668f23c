//! Infinite plane primitive with a procedural checkerboard.

use crate::hit::HitRecord;
use crate::shape::{Shape, ShapeAttributes};
use glint_core::{Surface, TextureRegistry};
use glint_math::{Color, DVec2, DVec3, Ray, THRESHOLD};

/// Size of one texture tile in world units.
const TEXTURE_TILE: f64 = 5.0;

/// A plane through `point` with unit normal `normal`.
///
/// Points on the side opposite to the normal count as inside, so a plane
/// can act as a half-space in CSG.
pub struct Plane {
    normal: DVec3,
    point: DVec3,
    attributes: ShapeAttributes,
}

impl Plane {
    /// Create a plane. The normal is normalized, falling back to +Y.
    pub fn new(normal: DVec3, point: DVec3) -> Self {
        Self {
            normal: normal.normalize_or(DVec3::Y),
            point,
            attributes: ShapeAttributes::default(),
        }
    }

    fn solve(&self, ray: &Ray) -> Option<f64> {
        let nd = self.normal.dot(ray.direction());
        if nd.abs() < THRESHOLD {
            return None;
        }
        let t = self.normal.dot(self.point - ray.origin()) / nd;
        (t >= THRESHOLD).then_some(t)
    }
}

/// Alternating red and white unit cells on the XZ plane.
pub fn checker(p: DVec3) -> Color {
    let cell = |c: f64| {
        let i = c.trunc() as i64;
        if c < 0.0 {
            -i + 1
        } else {
            i
        }
    };

    if (cell(p.x) % 2 + cell(p.z) % 2) % 2 != 0 {
        Color::new(1.0, 0.0, 0.0)
    } else {
        Color::ONE
    }
}

/// Texture coordinates tiling the XZ plane every [`TEXTURE_TILE`] units.
pub fn tile_coords(p: DVec3) -> DVec2 {
    let wrap = |c: f64| {
        let f = c / TEXTURE_TILE - (c / TEXTURE_TILE).trunc();
        if f < 0.0 {
            f + 1.0
        } else {
            f
        }
    };
    DVec2::new(wrap(p.x), wrap(p.z))
}

impl Shape for Plane {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let Some(t) = self.solve(ray) else {
            return false;
        };
        *hit = HitRecord::at(self, t);
        hit.set_geometry(ray.at(t), self.normal, ray.direction());
        true
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        let mut hit = HitRecord::default();
        if self.intersect(ray, &mut hit) {
            hits.push(hit);
        }
    }

    fn is_inside(&self, p: DVec3) -> bool {
        (p - self.point).dot(self.normal) < 0.0
    }

    fn normal(&self, _hit: &HitRecord) -> DVec3 {
        self.normal
    }

    fn mode(&self, hit: &HitRecord, surface: &Surface, textures: &TextureRegistry) -> Color {
        match surface.texture(0) {
            Some(id) => textures.color_at(id, tile_coords(hit.p)),
            None => checker(hit.p),
        }
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "plane"
    }
}
