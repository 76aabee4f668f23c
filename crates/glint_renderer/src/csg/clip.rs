use super::{crossings, earliest, leaf_normal};
use crate::hit::HitRecord;
use crate::shape::{is_inside_world, Shape, ShapeAttributes};
use glint_math::{DVec3, Ray};

/// One-sided difference: A's surface outside B, with no wall added where B
/// cuts A open.
pub struct Clip {
    a: Box<dyn Shape>,
    b: Box<dyn Shape>,
    attributes: ShapeAttributes,
}

impl Clip {
    pub fn new(a: Box<dyn Shape>, b: Box<dyn Shape>) -> Self {
        Self {
            a,
            b,
            attributes: ShapeAttributes::default(),
        }
    }

    fn surviving<'a>(&'a self, ray: &Ray) -> impl Iterator<Item = HitRecord<'a>> + 'a {
        let b = self.b.as_ref();
        crossings(self.a.as_ref(), ray)
            .into_iter()
            .filter(move |h| !is_inside_world(b, h.p))
    }
}

impl Shape for Clip {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        match earliest(self.surviving(ray)) {
            Some(best) => {
                *hit = best;
                true
            }
            None => false,
        }
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        hits.extend(self.surviving(ray));
    }

    fn is_inside(&self, p: DVec3) -> bool {
        is_inside_world(self.a.as_ref(), p) && !is_inside_world(self.b.as_ref(), p)
    }

    fn normal(&self, hit: &HitRecord) -> DVec3 {
        leaf_normal(hit)
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "clip"
    }
}
