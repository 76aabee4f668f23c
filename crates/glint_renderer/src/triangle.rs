//! Triangle primitive and the polygon math shared with meshes.

use crate::hit::HitRecord;
use crate::shape::{Shape, ShapeAttributes};
use glint_core::{Surface, TextureRegistry};
use glint_math::{Aabb, Color, DVec2, DVec3, Ray, THRESHOLD};

/// A triangle with precomputed dual basis vectors.
///
/// For a point `P` in the triangle plane, `u = P·u1 - u0` and
/// `v = P·v1 - v0` are its barycentric weights for the second and third
/// vertex; the first vertex gets `1 - u - v`.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: [DVec3; 3],
    uvs: [DVec2; 3],
    normal: DVec3,
    u1: DVec3,
    v1: DVec3,
    u0: f64,
    v0: f64,
    degenerate: bool,
}

impl Polygon {
    pub fn new(vertices: [DVec3; 3], uvs: [DVec2; 3]) -> Self {
        let [p1, p2, p3] = vertices;
        let s1 = p2 - p1;
        let s2 = p3 - p1;

        let s11 = s1.length_squared();
        let s22 = s2.length_squared();
        let s12 = s1.dot(s2);
        let det = s11 * s22 - s12 * s12;
        let degenerate = det.abs() < f64::EPSILON * s11 * s22 || !det.is_finite();

        let (u1, v1) = if degenerate {
            (DVec3::ZERO, DVec3::ZERO)
        } else {
            ((s1 * s22 - s2 * s12) / det, (s2 * s11 - s1 * s12) / det)
        };

        Self {
            vertices,
            uvs,
            normal: s1.cross(s2).normalize_or_zero(),
            u1,
            v1,
            u0: p1.dot(u1),
            v0: p1.dot(v1),
            degenerate,
        }
    }

    pub fn vertices(&self) -> &[DVec3; 3] {
        &self.vertices
    }

    /// Unit normal, following the winding of the vertices.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_iter_points(self.vertices)
    }

    /// Barycentric weights of the second and third vertex at a plane point.
    pub fn weights(&self, p: DVec3) -> (f64, f64) {
        (p.dot(self.u1) - self.u0, p.dot(self.v1) - self.v0)
    }

    /// Hit parameter and weights `(t, u, v)`.
    pub fn intersect(&self, ray: &Ray) -> Option<(f64, f64, f64)> {
        if self.degenerate {
            return None;
        }

        let nd = self.normal.dot(ray.direction());
        if nd.abs() < THRESHOLD {
            return None;
        }

        let t = self.normal.dot(self.vertices[0] - ray.origin()) / nd;
        if t < THRESHOLD {
            return None;
        }

        let (u, v) = self.weights(ray.at(t));
        if u < THRESHOLD || v < THRESHOLD || u + v - 1.0 > THRESHOLD {
            return None;
        }
        Some((t, u, v))
    }

    /// Interpolated texture coordinates at barycentric weights.
    pub fn texture_coords(&self, u: f64, v: f64) -> DVec2 {
        let w = 1.0 - u - v;
        self.uvs[0] * w + self.uvs[1] * u + self.uvs[2] * v
    }
}

/// Sample texture slot 0 of `surface` at the weights cached in `hit`.
pub(crate) fn textured_color(
    polygon: &Polygon,
    hit: &HitRecord,
    surface: &Surface,
    textures: &TextureRegistry,
) -> Color {
    match surface.texture(0) {
        Some(id) => {
            let tc = polygon.texture_coords(hit.doubles[0], hit.doubles[1]);
            textures.color_at(id, tc)
        }
        None => surface.kd,
    }
}

/// A single triangle shape.
pub struct Triangle {
    polygon: Polygon,
    attributes: ShapeAttributes,
}

impl Triangle {
    /// Create a triangle. Triangles default to the Ruby surface.
    pub fn new(a: DVec3, b: DVec3, c: DVec3) -> Self {
        Self::with_uvs([a, b, c], [DVec2::ZERO; 3])
    }

    pub fn with_uvs(vertices: [DVec3; 3], uvs: [DVec2; 3]) -> Self {
        let ruby = Surface::named("Ruby");
        Self {
            polygon: Polygon::new(vertices, uvs),
            attributes: ShapeAttributes::new(Surface::new(ruby.ka, ruby.kd, ruby.ks, ruby.ph)),
        }
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

impl Shape for Triangle {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let Some((t, u, v)) = self.polygon.intersect(ray) else {
            return false;
        };

        *hit = HitRecord::at(self, t);
        hit.set_geometry(ray.at(t), self.polygon.normal, ray.direction());
        hit.doubles = [u, v];
        true
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        let mut hit = HitRecord::default();
        if self.intersect(ray, &mut hit) {
            hits.push(hit);
        }
    }

    fn is_inside(&self, _p: DVec3) -> bool {
        false
    }

    fn normal(&self, _hit: &HitRecord) -> DVec3 {
        self.polygon.normal
    }

    fn mode(&self, hit: &HitRecord, surface: &Surface, textures: &TextureRegistry) -> Color {
        textured_color(&self.polygon, hit, surface, textures)
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "triangle"
    }
}
