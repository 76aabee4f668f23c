//! Whitted-style shading: ambient, Lambert diffuse, Phong specular, hard
//! shadows and recursive mirror reflection.

use crate::control::RenderControl;
use crate::hit::HitRecord;
use crate::scene::{Media, Scene};
use glint_math::{Color, DVec3, Ray, THRESHOLD};

/// Reflection rays whose contribution weight falls below this are skipped.
pub const COLOR_THRESHOLD: f64 = 0.002;

/// Traces rays through a scene, watching a render control for cancellation.
#[derive(Clone, Copy)]
pub struct Tracer<'s> {
    scene: &'s Scene,
    control: &'s RenderControl,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s Scene, control: &'s RenderControl) -> Self {
        Self { scene, control }
    }

    /// Colour seen along `ray`.
    ///
    /// `weight` is the share of the final pixel this ray contributes and
    /// `level` the number of bounces so far. Returns the background when a
    /// stop was requested, the recursion limit is reached or nothing is hit.
    pub fn trace(&self, ray: &Ray, media: &Media, weight: f64, level: u32) -> Color {
        let scene = self.scene;
        if self.control.is_stop_requested() || level >= scene.max_rec_level {
            return scene.background;
        }

        let Some(mut hit) = scene.intersect(ray, None) else {
            return scene.background;
        };

        hit.p = ray.at(hit.t);
        hit.n = hit.n.normalize_or_zero();

        let color = self.shade(ray.direction(), media, &hit, weight, level + 1);
        color * (-hit.t * media.decay).exp()
    }

    /// Local illumination at a hit plus the reflected contribution.
    ///
    /// `incoming` is the direction of the ray that produced the hit.
    pub fn shade(
        &self,
        incoming: DVec3,
        media: &Media,
        hit: &HitRecord<'s>,
        weight: f64,
        level: u32,
    ) -> Color {
        let scene = self.scene;
        let (Some(shape), Some(surface)) = (hit.shape, scene.surface(hit)) else {
            return scene.background;
        };

        let v = incoming.normalize_or_zero();
        let n = if v.dot(hit.n) > 0.0 { -hit.n } else { hit.n };
        let r = (v - n * (2.0 * v.dot(n))).normalize_or_zero();

        let mut color = surface.ka * scene.ambient;

        for light in scene.lights() {
            let sample = light.shadow(hit.p);
            let l = sample.direction;

            // Hard shadows: any blocker nearer than the light hides it
            let shadow_ray = Ray::new(hit.p + l * THRESHOLD, l);
            if scene
                .intersect(&shadow_ray, None)
                .is_some_and(|blocker| blocker.t < sample.distance)
            {
                continue;
            }

            let nl = n.dot(l);
            if nl <= THRESHOLD {
                continue;
            }

            let diffuse = if shape.attributes().uses_mode {
                shape.mode(hit, surface, &scene.textures)
            } else {
                surface.kd
            };
            color += diffuse * sample.color * nl;

            let rl = r.dot(l);
            if rl > THRESHOLD {
                color += surface.ks * sample.color * rl.powf(surface.ph);
            }
        }

        if surface.kr.in_use() {
            let w = surface.kr.max_component() * weight;
            if w > COLOR_THRESHOLD {
                let reflected = Ray::new(hit.p + r * THRESHOLD, r);
                color += surface.kr.k() * self.trace(&reflected, media, w, level);
            }
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_box::AxisBox;
    use crate::light::PointLight;
    use crate::plane::Plane;
    use crate::shape::ShapeExt;
    use crate::sphere::Sphere;
    use glint_core::Surface;

    fn matte(kd: Color) -> Surface {
        let mut surface = Surface::new(Color::splat(0.1), kd, Color::ZERO, 1.0);
        surface.kr.set(Color::ZERO);
        surface
    }

    fn lit_scene(surface: Surface) -> Scene {
        let mut scene = Scene::new().with_ambient(Color::ONE);
        scene.add_shape(Plane::new(DVec3::Y, DVec3::ZERO).with_surface(surface.clone()).boxed());
        scene.add_shape(
            Sphere::new(DVec3::new(0.0, 1.0, 0.0), 1.0)
                .with_surface(surface)
                .boxed(),
        );
        scene.add_light(Box::new(PointLight::new(DVec3::new(3.0, 5.0, 4.0))));
        scene
    }

    #[test]
    fn test_miss_gives_background() {
        let scene = Scene::new();
        let control = RenderControl::new();
        let tracer = Tracer::new(&scene, &control);
        let c = tracer.trace(&Ray::new(DVec3::ZERO, DVec3::Z), &Media::AIR, 0.1, 0);
        assert_eq!(c, scene.background);
    }

    #[test]
    fn test_stop_gives_background() {
        let scene = lit_scene(matte(Color::ONE));
        let control = RenderControl::new();
        control.request_stop();
        let tracer = Tracer::new(&scene, &control);

        let ray = Ray::new(DVec3::new(0.0, 1.0, 5.0), DVec3::NEG_Z);
        assert_eq!(tracer.trace(&ray, &Media::AIR, 0.1, 0), scene.background);
    }

    #[test]
    fn test_non_reflective_ignores_recursion_limit() {
        let control = RenderControl::new();
        let rays = [
            Ray::new(DVec3::new(0.0, 1.0, 5.0), DVec3::NEG_Z),
            Ray::new(DVec3::new(2.0, 3.0, 4.0), DVec3::new(-0.4, -0.6, -0.7)),
            Ray::new(DVec3::new(-3.0, 0.5, 3.0), DVec3::new(0.5, 0.1, -0.5)),
        ];

        let shallow = lit_scene(matte(Color::new(0.8, 0.3, 0.2))).with_max_rec_level(1);
        let deep = lit_scene(matte(Color::new(0.8, 0.3, 0.2))).with_max_rec_level(100);
        let a = Tracer::new(&shallow, &control);
        let b = Tracer::new(&deep, &control);

        for ray in &rays {
            assert_eq!(
                a.trace(ray, &Media::AIR, 0.1, 0),
                b.trace(ray, &Media::AIR, 0.1, 0)
            );
        }
    }

    #[test]
    fn test_ambient_and_diffuse() {
        let mut scene = Scene::new().with_ambient(Color::splat(0.5));
        scene.add_shape(
            Plane::new(DVec3::Y, DVec3::ZERO)
                .with_surface(matte(Color::ONE))
                .boxed(),
        );
        scene.add_light(Box::new(PointLight::new(DVec3::new(0.0, 10.0, 0.0))));
        let control = RenderControl::new();
        let tracer = Tracer::new(&scene, &control);

        // Straight down onto the plane under the light: N·L = 1
        let c = tracer.trace(&Ray::new(DVec3::new(0.0, 5.0, 0.0), DVec3::NEG_Y), &Media::AIR, 0.1, 0);
        assert!((c - Color::splat(0.05 + 1.0)).length() < 1e-9);
    }

    #[test]
    fn test_shadowed_point_gets_ambient_only() {
        let mut scene = Scene::new().with_ambient(Color::ONE);
        scene.add_shape(
            Plane::new(DVec3::Y, DVec3::ZERO)
                .with_surface(matte(Color::ONE))
                .boxed(),
        );
        scene.add_shape(
            AxisBox::new(DVec3::new(-1.0, 2.0, -1.0), DVec3::new(1.0, 3.0, 1.0))
                .with_surface(matte(Color::ONE))
                .boxed(),
        );
        scene.add_light(Box::new(PointLight::new(DVec3::new(0.0, 10.0, 0.0))));
        let control = RenderControl::new();
        let tracer = Tracer::new(&scene, &control);

        let ray = Ray::new(DVec3::new(0.0, 1.0, 5.0), DVec3::new(0.0, -1.0, -5.0));
        let c = tracer.trace(&ray, &Media::AIR, 0.1, 0);
        assert!((c - Color::splat(0.1)).length() < 1e-9);
    }

    #[test]
    fn test_mirror_reflects_background() {
        // A perfect mirror facing the ray with no lights returns kr * background
        let mut surface = Surface::new(Color::ZERO, Color::ZERO, Color::ZERO, 1.0);
        surface.kr.set(Color::ONE);
        let mut scene = Scene::new();
        scene.add_shape(Plane::new(DVec3::Z, DVec3::ZERO).with_surface(surface).boxed());
        let control = RenderControl::new();
        let tracer = Tracer::new(&scene, &control);

        let c = tracer.trace(&Ray::new(DVec3::new(0.0, 0.0, 3.0), DVec3::NEG_Z), &Media::AIR, 1.0, 0);
        assert!((c - scene.background).length() < 1e-12);
    }

    #[test]
    fn test_decay_attenuates() {
        let mut scene = Scene::new().with_ambient(Color::ONE);
        scene.add_shape(
            Plane::new(DVec3::Z, DVec3::ZERO)
                .with_surface(matte(Color::ZERO))
                .boxed(),
        );
        let control = RenderControl::new();
        let tracer = Tracer::new(&scene, &control);
        let fog = Media {
            refraction_coef: 1.0,
            decay: 0.5,
        };

        let c = tracer.trace(&Ray::new(DVec3::new(0.0, 0.0, 2.0), DVec3::NEG_Z), &fog, 0.1, 0);
        assert!((c.x - 0.1 * (-1.0f64).exp()).abs() < 1e-12);
    }
}
