use super::{crossings, earliest, leaf_normal};
use crate::hit::HitRecord;
use crate::shape::{is_inside_world, Shape, ShapeAttributes};
use glint_math::{DVec3, Ray};

/// Intersection of two shapes: surface of each child lying inside the other.
pub struct Intersection {
    a: Box<dyn Shape>,
    b: Box<dyn Shape>,
    attributes: ShapeAttributes,
}

impl Intersection {
    pub fn new(a: Box<dyn Shape>, b: Box<dyn Shape>) -> Self {
        Self {
            a,
            b,
            attributes: ShapeAttributes::default(),
        }
    }

    /// Both children's hits, each kept only where the other child contains it.
    fn surviving<'a>(&'a self, ray: &Ray) -> Vec<HitRecord<'a>> {
        let hits_a = crossings(self.a.as_ref(), ray);
        if hits_a.is_empty() {
            return Vec::new();
        }
        let hits_b = crossings(self.b.as_ref(), ray);
        if hits_b.is_empty() {
            return Vec::new();
        }

        let a = self.a.as_ref();
        let b = self.b.as_ref();
        hits_a
            .into_iter()
            .filter(|h| is_inside_world(b, h.p))
            .chain(hits_b.into_iter().filter(|h| is_inside_world(a, h.p)))
            .collect()
    }
}

impl Shape for Intersection {
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
        is_inside_world(self.a.as_ref(), p) && is_inside_world(self.b.as_ref(), p)
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
        "intersection"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_box::AxisBox;
    use crate::shape::ShapeExt;
    use crate::sphere::Sphere;
    use glint_math::DMat4;

    fn lens() -> Intersection {
        Intersection::new(
            Sphere::new(DVec3::new(-0.5, 0.0, 0.0), 1.0).boxed(),
            Sphere::new(DVec3::new(0.5, 0.0, 0.0), 1.0).boxed(),
        )
    }

    #[test]
    fn test_lens_surface() {
        let l = lens();
        let ray = Ray::new(DVec3::new(-5.0, 0.0, 0.0), DVec3::X);
        let mut hit = HitRecord::default();

        // Enters through the right sphere's wall at x = -0.5
        assert!(l.intersect(&ray, &mut hit));
        assert!((hit.t - 4.5).abs() < 1e-9);

        let mut hits = Vec::new();
        l.all_intersect(&ray, &mut hits);
        let mut ts: Vec<f64> = hits.iter().map(|h| h.t).collect();
        ts.sort_by(f64::total_cmp);
        assert_eq!(ts.len(), 2);
        assert!((ts[1] - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_lens_misses_outside_overlap() {
        let l = lens();
        // Crosses only the left sphere
        let ray = Ray::new(DVec3::new(-1.2, 5.0, 0.0), DVec3::NEG_Y);
        assert!(!l.is_intersect(&ray));
        assert!(l.is_inside(DVec3::ZERO));
        assert!(!l.is_inside(DVec3::new(-1.2, 0.0, 0.0)));
    }

    #[test]
    fn test_transformed_child() {
        // Unit box moved to x in [2, 4], intersected with a sphere around x = 3
        let b = AxisBox::new(DVec3::splat(-1.0), DVec3::splat(1.0))
            .with_matrix(DMat4::from_translation(DVec3::new(3.0, 0.0, 0.0)));
        let s = Sphere::new(DVec3::new(3.0, 0.0, 0.0), 1.2);
        let i = Intersection::new(b.boxed(), s.boxed());

        let ray = Ray::new(DVec3::new(3.0, 0.0, 10.0), DVec3::NEG_Z);
        let mut hit = HitRecord::default();
        assert!(i.intersect(&ray, &mut hit));
        // Box face at z = 1 lies inside the sphere
        assert!((hit.t - 9.0).abs() < 1e-9);
        assert!((hit.p - DVec3::new(3.0, 0.0, 1.0)).length() < 1e-9);
    }
}
