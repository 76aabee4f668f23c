//! Sphere primitive for ray tracing.

use crate::hit::HitRecord;
use crate::shape::{Shape, ShapeAttributes};
use glint_math::{DVec3, Ray, THRESHOLD};

/// A sphere primitive.
pub struct Sphere {
    center: DVec3,
    radius: f64,
    radius2: f64,
    attributes: ShapeAttributes,
}

/// Quantities shared by the nearest-hit and all-hits solves, computed on a
/// unit-direction ray.
struct Projection {
    /// Squared distance from ray origin to centre
    oc2: f64,
    /// Distance along the ray to the point closest to the centre
    ok: f64,
    /// Squared half chord
    h2: f64,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64) -> Self {
        let radius = radius.max(0.0);
        Self {
            center,
            radius,
            radius2: radius * radius,
            attributes: ShapeAttributes::default(),
        }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn project(&self, unit: &Ray) -> Projection {
        let a = self.center - unit.origin();
        let oc2 = a.length_squared();
        let ok = a.dot(unit.direction());
        Projection {
            oc2,
            ok,
            h2: self.radius2 - (oc2 - ok * ok),
        }
    }

    fn record<'a>(&'a self, ray: &Ray, t: f64) -> HitRecord<'a> {
        let mut hit = HitRecord::at(self, t);
        let p = ray.at(t);
        hit.set_geometry(p, (p - self.center) / self.radius, ray.direction());
        hit
    }
}

impl Shape for Sphere {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let (unit, len) = ray.normalized();
        let Projection { oc2, ok, h2 } = self.project(&unit);

        let distance = if oc2 < self.radius2 {
            // Ray starts inside: leave through the far side
            ok + h2.sqrt()
        } else {
            if ok < THRESHOLD || h2 < THRESHOLD {
                return false;
            }
            ok - h2.sqrt()
        };

        if distance < THRESHOLD {
            return false;
        }

        *hit = self.record(ray, distance / len);
        true
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        let (unit, len) = ray.normalized();
        let Projection { ok, h2, .. } = self.project(&unit);
        if h2 < 0.0 {
            return;
        }

        let h = h2.sqrt();
        for distance in [ok - h, ok + h] {
            if distance > THRESHOLD {
                hits.push(self.record(ray, distance / len));
            }
        }
    }

    fn is_inside(&self, p: DVec3) -> bool {
        (p - self.center).length_squared() < self.radius2
    }

    fn normal(&self, hit: &HitRecord) -> DVec3 {
        (hit.p - self.center) / self.radius
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "sphere"
    }
}
