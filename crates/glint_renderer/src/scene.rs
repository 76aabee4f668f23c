//! Scene aggregate: shapes, lights, registries and global parameters.

use crate::hit::HitRecord;
use crate::light::Light;
use crate::shape::{intersect_world, Shape};
use glint_core::{MaterialRegistry, Surface, TextureRegistry};
use glint_math::{Color, Ray};

/// Default background colour.
pub const DEFAULT_BACKGROUND: Color = Color::new(0.3, 0.47, 0.8);

/// Default recursion limit for [`crate::Tracer::trace`].
pub const DEFAULT_MAX_REC_LEVEL: u32 = 5;

/// Optical properties of the medium a ray travels through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Media {
    pub refraction_coef: f64,
    /// Exponential attenuation per unit distance
    pub decay: f64,
}

impl Media {
    pub const AIR: Media = Media {
        refraction_coef: 1.0,
        decay: 0.0,
    };
}

impl Default for Media {
    fn default() -> Self {
        Self::AIR
    }
}

/// Distance fog. Stored with the scene but not applied while shading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub start: f64,
    pub end: f64,
}

/// Everything a render pass reads.
///
/// Populate the scene before rendering; it is shared read-only between
/// workers during a pass.
pub struct Scene {
    shapes: Vec<Box<dyn Shape>>,
    lights: Vec<Box<dyn Light>>,
    pub materials: MaterialRegistry,
    pub textures: TextureRegistry,
    pub ambient: Color,
    pub background: Color,
    pub fog: Option<Fog>,
    pub max_rec_level: u32,
    pub air: Media,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            lights: Vec::new(),
            materials: MaterialRegistry::new(),
            textures: TextureRegistry::new(),
            ambient: Color::ZERO,
            background: DEFAULT_BACKGROUND,
            fog: None,
            max_rec_level: DEFAULT_MAX_REC_LEVEL,
            air: Media::AIR,
        }
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_max_rec_level(mut self, level: u32) -> Self {
        self.max_rec_level = level;
        self
    }

    pub fn add_shape(&mut self, shape: Box<dyn Shape>) {
        log::debug!("Adding {} to scene", shape.name());
        self.shapes.push(shape);
    }

    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.push(light);
    }

    /// Remove shapes and lights and empty both registries.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.lights.clear();
        self.materials.clear();
        self.textures.clear();
    }

    pub fn shapes(&self) -> &[Box<dyn Shape>] {
        &self.shapes
    }

    pub fn lights(&self) -> &[Box<dyn Light>] {
        &self.lights
    }

    /// Nearest hit over all top-level shapes, skipping `exclude`.
    pub fn intersect<'s>(&'s self, ray: &Ray, exclude: Option<&dyn Shape>) -> Option<HitRecord<'s>> {
        let mut best: Option<HitRecord<'s>> = None;

        for shape in &self.shapes {
            let shape = shape.as_ref();
            if exclude.is_some_and(|ex| std::ptr::addr_eq(shape, ex)) {
                continue;
            }

            let mut hit = HitRecord::default();
            if intersect_world(shape, ray, &mut hit) && best.map_or(true, |b| hit.t < b.t) {
                best = Some(hit);
            }
        }

        best
    }

    /// Surface to shade a hit with: the registry material when the hit
    /// carries one, otherwise the leaf shape's own surface.
    pub fn surface<'s>(&'s self, hit: &HitRecord<'s>) -> Option<&'s Surface> {
        if let Some(surface) = hit.material.and_then(|id| self.materials.get(id)) {
            return Some(surface);
        }
        hit.shape.map(|shape| &shape.attributes().surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PointLight;
    use crate::shape::ShapeExt;
    use crate::sphere::Sphere;
    use glint_math::DVec3;

    fn two_spheres() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0).boxed());
        scene.add_shape(Sphere::new(DVec3::new(0.0, 0.0, -10.0), 1.0).boxed());
        scene
    }

    #[test]
    fn test_defaults() {
        let scene = Scene::new();
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert_eq!(scene.ambient, Color::ZERO);
        assert_eq!(scene.max_rec_level, 5);
        assert_eq!(scene.air, Media::AIR);
        assert!(scene.fog.is_none());
    }

    #[test]
    fn test_intersect_nearest() {
        let scene = two_spheres();
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let hit = scene.intersect(&ray, None).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersect_exclude() {
        let scene = two_spheres();
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let first = scene.shapes()[0].as_ref();

        let hit = scene.intersect(&ray, Some(first)).unwrap();
        assert!((hit.t - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_intersect_transformed_shape() {
        let mut scene = Scene::new();
        scene.add_shape(
            Sphere::new(DVec3::ZERO, 1.0)
                .with_matrix(glint_math::DMat4::from_translation(DVec3::new(0.0, 0.0, -5.0)))
                .boxed(),
        );
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let hit = scene.intersect(&ray, None).unwrap();

        assert!((hit.t - 4.0).abs() < 1e-9);
        assert!((hit.p - DVec3::new(0.0, 0.0, -4.0)).length() < 1e-9);
        assert!((hit.n.normalize() - DVec3::Z).length() < 1e-9);
    }

    #[test]
    fn test_material_overrides_surface() {
        let mut scene = Scene::new();
        let jade = scene.materials.add("Jade", Surface::named("Jade"));
        scene.add_shape(Sphere::new(DVec3::new(0.0, 0.0, -5.0), 1.0).with_material(jade).boxed());
        scene.add_shape(Sphere::new(DVec3::new(3.0, 0.0, -5.0), 1.0).boxed());

        let hit = scene.intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z), None).unwrap();
        assert_eq!(scene.surface(&hit).unwrap().kd, Surface::named("Jade").kd);

        let ray = Ray::new(DVec3::new(3.0, 0.0, 0.0), DVec3::NEG_Z);
        let hit = scene.intersect(&ray, None).unwrap();
        assert_eq!(scene.surface(&hit).unwrap().kd, Surface::default().kd);
    }

    #[test]
    fn test_clear() {
        let mut scene = two_spheres();
        scene.add_light(Box::new(PointLight::new(DVec3::Y)));
        scene.clear();
        assert!(scene.shapes().is_empty());
        assert!(scene.lights().is_empty());
    }
}
