use super::{crossings, earliest, leaf_normal};
use crate::hit::HitRecord;
use crate::shape::{is_inside_world, Shape, ShapeAttributes};
use glint_math::{DVec3, Ray};

/// Difference `A - B`.
///
/// A's surface survives outside B, and B's surface survives inside A where
/// it becomes the wall of the carved-out volume.
pub struct Subtrack {
    a: Box<dyn Shape>,
    b: Box<dyn Shape>,
    attributes: ShapeAttributes,
}

impl Subtrack {
    pub fn new(a: Box<dyn Shape>, b: Box<dyn Shape>) -> Self {
        Self {
            a,
            b,
            attributes: ShapeAttributes::default(),
        }
    }

    fn surviving<'a>(&'a self, ray: &Ray) -> Vec<HitRecord<'a>> {
        let hits_a = crossings(self.a.as_ref(), ray);
        if hits_a.is_empty() {
            return Vec::new();
        }
        let hits_b = crossings(self.b.as_ref(), ray);

        let a = self.a.as_ref();
        let b = self.b.as_ref();
        hits_a
            .into_iter()
            .filter(|h| !is_inside_world(b, h.p))
            .chain(
                hits_b
                    .into_iter()
                    .filter(|h| is_inside_world(a, h.p))
                    .map(carved_wall),
            )
            .collect()
    }
}

/// B's surface inside A faces into B, the opposite of B's outward normal.
fn carved_wall(mut hit: HitRecord) -> HitRecord {
    hit.n = -hit.n;
    hit.kind = hit.kind.flipped();
    hit
}

impl Shape for Subtrack {
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
        "subtrack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_box::AxisBox;
    use crate::hit::HitKind;
    use crate::shape::ShapeExt;
    use crate::sphere::Sphere;

    #[test]
    fn test_swallowed_box_vanishes() {
        let s = Subtrack::new(
            AxisBox::new(DVec3::splat(-1.0), DVec3::splat(1.0)).boxed(),
            AxisBox::new(DVec3::splat(-2.0), DVec3::splat(2.0)).boxed(),
        );

        let rays = [
            Ray::new(DVec3::new(0.0, 0.0, 10.0), DVec3::NEG_Z),
            Ray::new(DVec3::new(-10.0, 0.3, -0.2), DVec3::X),
            Ray::new(DVec3::ZERO, DVec3::new(1.0, 1.0, 1.0)),
            Ray::new(DVec3::new(5.0, 5.0, 5.0), DVec3::new(-1.0, -1.1, -0.9)),
        ];
        for ray in &rays {
            assert!(!s.is_intersect(ray));
            let mut hits = Vec::new();
            s.all_intersect(ray, &mut hits);
            assert!(hits.is_empty());
        }

        for p in [DVec3::ZERO, DVec3::splat(0.99), DVec3::splat(1.5), DVec3::splat(3.0)] {
            assert!(!s.is_inside(p));
        }
    }

    #[test]
    fn test_carved_sphere() {
        // Unit box with a sphere bitten out of its +Z face
        let s = Subtrack::new(
            AxisBox::new(DVec3::splat(-1.0), DVec3::splat(1.0)).boxed(),
            Sphere::new(DVec3::new(0.0, 0.0, 1.0), 0.5).boxed(),
        );

        // Through the bite: lands on the sphere wall at z = 0.5
        let ray = Ray::new(DVec3::new(0.0, 0.0, 5.0), DVec3::NEG_Z);
        let mut hit = HitRecord::default();
        assert!(s.intersect(&ray, &mut hit));
        assert!((hit.t - 4.5).abs() < 1e-9);
        assert_eq!(hit.shape.map(|s| s.name()), Some("sphere"));
        // The carved wall faces out of the solid and the ray enters there
        assert!((s.normal(&hit).normalize() - DVec3::Z).length() < 1e-9);
        assert_eq!(hit.kind, HitKind::Enter);

        // Beside the bite: the box face
        let ray = Ray::new(DVec3::new(0.8, 0.0, 5.0), DVec3::NEG_Z);
        assert!(s.intersect(&ray, &mut hit));
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert_eq!(hit.shape.map(|s| s.name()), Some("box"));

        assert!(s.is_inside(DVec3::new(0.0, 0.0, -0.5)));
        assert!(!s.is_inside(DVec3::new(0.0, 0.0, 0.9)));
    }
}
