use crate::hit::HitRecord;
use crate::shape::{
    all_intersect_world, intersect_world, is_inside_world, is_intersect_world, Shape,
    ShapeAttributes,
};
use glint_math::{DVec3, Ray};

/// A shape guarded by a cheaper bounding shape.
///
/// Queries reach the inner shape only when the bounding shape is hit (or,
/// for containment, contains the point). The bounding shape itself is never
/// visible.
pub struct Bound {
    shape: Box<dyn Shape>,
    bound: Box<dyn Shape>,
    attributes: ShapeAttributes,
}

impl Bound {
    pub fn new(shape: Box<dyn Shape>, bound: Box<dyn Shape>) -> Self {
        Self {
            shape,
            bound,
            attributes: ShapeAttributes::default(),
        }
    }

    fn passes(&self, ray: &Ray) -> bool {
        is_intersect_world(self.bound.as_ref(), ray)
    }
}

impl Shape for Bound {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        self.passes(ray) && intersect_world(self.shape.as_ref(), ray, hit)
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        if self.passes(ray) {
            all_intersect_world(self.shape.as_ref(), ray, hits);
        }
    }

    fn is_inside(&self, p: DVec3) -> bool {
        is_inside_world(self.bound.as_ref(), p) && is_inside_world(self.shape.as_ref(), p)
    }

    fn is_intersect(&self, ray: &Ray) -> bool {
        self.passes(ray) && is_intersect_world(self.shape.as_ref(), ray)
    }

    fn normal(&self, hit: &HitRecord) -> DVec3 {
        super::leaf_normal(hit)
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "bound"
    }
}
