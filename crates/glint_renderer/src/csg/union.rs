use super::{crossings, earliest, leaf_normal};
use crate::hit::HitRecord;
use crate::shape::{is_inside_world, Shape, ShapeAttributes};
use glint_math::{DVec3, Ray};

/// Union of two shapes: every surface of both children.
pub struct Union {
    a: Box<dyn Shape>,
    b: Box<dyn Shape>,
    attributes: ShapeAttributes,
}

impl Union {
    pub fn new(a: Box<dyn Shape>, b: Box<dyn Shape>) -> Self {
        Self {
            a,
            b,
            attributes: ShapeAttributes::default(),
        }
    }
}

impl Shape for Union {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let mut hits = crossings(self.a.as_ref(), ray);
        hits.extend(crossings(self.b.as_ref(), ray));

        match earliest(hits) {
            Some(best) => {
                *hit = best;
                true
            }
            None => false,
        }
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        hits.extend(crossings(self.a.as_ref(), ray));
        hits.extend(crossings(self.b.as_ref(), ray));
    }

    fn is_inside(&self, p: DVec3) -> bool {
        is_inside_world(self.a.as_ref(), p) || is_inside_world(self.b.as_ref(), p)
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
        "union"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{intersect_world, ShapeExt};
    use crate::sphere::Sphere;
    use glint_math::DMat4;

    fn pair() -> Union {
        Union::new(
            Sphere::new(DVec3::new(-5.0, 0.0, 0.0), 1.0).boxed(),
            Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0).boxed(),
        )
    }

    #[test]
    fn test_union_hits_each_sphere() {
        let u = pair();
        let origin = DVec3::new(0.0, 0.0, 10.0);

        for center in [DVec3::new(-5.0, 0.0, 0.0), DVec3::new(5.0, 0.0, 0.0)] {
            let to_center = center - origin;
            let ray = Ray::new(origin, to_center.normalize());
            let mut hit = HitRecord::default();

            assert!(u.intersect(&ray, &mut hit));
            assert!((hit.t - (to_center.length() - 1.0)).abs() < 1e-9);
            assert!((hit.p - center).length() - 1.0 < 1e-9);
        }
    }

    #[test]
    fn test_union_misses_between_spheres() {
        let u = pair();
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert!(!u.is_intersect(&ray));
    }

    #[test]
    fn test_union_all_intersect_and_inside() {
        let u = pair();
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
        let mut hits = Vec::new();
        u.all_intersect(&ray, &mut hits);

        assert_eq!(hits.len(), 4);
        assert!(u.is_inside(DVec3::new(5.5, 0.0, 0.0)));
        assert!(!u.is_inside(DVec3::ZERO));
    }

    #[test]
    fn test_normal_comes_from_leaf() {
        let u = pair();
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
        let mut hit = HitRecord::default();

        assert!(u.intersect(&ray, &mut hit));
        assert_eq!(hit.shape.map(|s| s.name()), Some("sphere"));
        assert!((u.normal(&hit) - DVec3::NEG_X).length() < 1e-9);
    }

    #[test]
    fn test_normal_of_translated_child() {
        let u = Union::new(
            Sphere::new(DVec3::ZERO, 1.0)
                .with_matrix(DMat4::from_translation(DVec3::new(5.0, 0.0, 0.0)))
                .boxed(),
            Sphere::new(DVec3::new(-5.0, 0.0, 0.0), 1.0).boxed(),
        );
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        let mut hit = HitRecord::default();

        assert!(u.intersect(&ray, &mut hit));
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert!((hit.p - DVec3::new(4.0, 0.0, 0.0)).length() < 1e-9);
        assert!((u.normal(&hit).normalize() - DVec3::NEG_X).length() < 1e-9);
    }

    #[test]
    fn test_material_on_union_wins_over_leaf() {
        let u = Union::new(
            Sphere::new(DVec3::new(-5.0, 0.0, 0.0), 1.0).with_material(1).boxed(),
            Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0).boxed(),
        )
        .with_material(4);
        let ray = Ray::new(DVec3::new(-10.0, 0.0, 0.0), DVec3::X);
        let mut hit = HitRecord::default();

        // The union's own material applies once it is queried from its parent
        assert!(intersect_world(&u, &ray, &mut hit));
        assert_eq!(hit.material, Some(4));

        // Without one, the leaf's material survives
        let plain = pair();
        assert!(intersect_world(&plain, &ray, &mut hit));
        assert_eq!(hit.material, None);
        let leafy = Union::new(
            Sphere::new(DVec3::new(-5.0, 0.0, 0.0), 1.0).with_material(1).boxed(),
            Sphere::new(DVec3::new(5.0, 0.0, 0.0), 1.0).boxed(),
        );
        assert!(intersect_world(&leafy, &ray, &mut hit));
        assert_eq!(hit.material, Some(1));
    }
}
