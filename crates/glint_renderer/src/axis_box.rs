//! Axis-aligned box primitive.

use crate::hit::HitRecord;
use crate::shape::{Shape, ShapeAttributes};
use glint_math::{Aabb, DVec3, Ray, THRESHOLD};

/// Face normals in lookup order: min faces first, then max faces.
const FACE_NORMALS: [DVec3; 6] = [
    DVec3::NEG_X,
    DVec3::NEG_Y,
    DVec3::NEG_Z,
    DVec3::X,
    DVec3::Y,
    DVec3::Z,
];

/// A solid box between two corners.
pub struct AxisBox {
    min: DVec3,
    max: DVec3,
    attributes: ShapeAttributes,
}

impl AxisBox {
    /// Create a box from any two opposite corners.
    pub fn new(a: DVec3, b: DVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
            attributes: ShapeAttributes::default(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.min, self.max)
    }

    /// Slab test. Returns the entry and exit parameters.
    fn slabs(&self, ray: &Ray) -> Option<(f64, f64)> {
        let origin = ray.origin();
        let direction = ray.direction();
        let mut tnear = f64::NEG_INFINITY;
        let mut tfar = f64::INFINITY;

        for axis in 0..3 {
            let (o, d) = (origin[axis], direction[axis]);
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d == 0.0 {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let mut t0 = (lo - o) / d;
            let mut t1 = (hi - o) / d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            tnear = tnear.max(t0);
            tfar = tfar.min(t1);

            if tnear > tfar || tfar < THRESHOLD {
                return None;
            }
        }

        Some((tnear, tfar))
    }

    fn record<'a>(&'a self, ray: &Ray, t: f64) -> HitRecord<'a> {
        let mut hit = HitRecord::at(self, t);
        let p = ray.at(t);
        hit.set_geometry(p, self.face_normal(p), ray.direction());
        hit
    }

    /// Normal of the face nearest to a surface point.
    fn face_normal(&self, p: DVec3) -> DVec3 {
        let distances = [
            (p.x - self.min.x).abs(),
            (p.y - self.min.y).abs(),
            (p.z - self.min.z).abs(),
            (p.x - self.max.x).abs(),
            (p.y - self.max.y).abs(),
            (p.z - self.max.z).abs(),
        ];

        let mut best = 0;
        for (i, d) in distances.iter().enumerate().skip(1) {
            if *d < distances[best] {
                best = i;
            }
        }
        FACE_NORMALS[best]
    }
}

impl Shape for AxisBox {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let Some((tnear, tfar)) = self.slabs(ray) else {
            return false;
        };

        // Inside the box the entry lies behind the origin
        let t = if tnear < THRESHOLD { tfar } else { tnear };
        if !t.is_finite() || t < THRESHOLD {
            return false;
        }

        *hit = self.record(ray, t);
        true
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        let Some((tnear, tfar)) = self.slabs(ray) else {
            return;
        };

        for t in [tnear, tfar] {
            if t.is_finite() && t > THRESHOLD {
                hits.push(self.record(ray, t));
            }
        }
    }

    fn is_inside(&self, p: DVec3) -> bool {
        self.bounds().contains(p)
    }

    fn normal(&self, hit: &HitRecord) -> DVec3 {
        self.face_normal(hit.p)
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "box"
    }
}
