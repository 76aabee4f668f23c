//! Building a renderable [`Scene`] from a [`SceneDescription`], and the
//! built-in demo scene.

use crate::axis_box::AxisBox;
use crate::csg::{Bound, Clip, Intersection, Subtrack, Union};
use crate::light::PointLight;
use crate::mesh::MeshShape;
use crate::plane::Plane;
use crate::scene::{Fog, Scene};
use crate::shape::{Shape, ShapeExt, Transform};
use crate::sphere::Sphere;
use crate::torus::Torus;
use crate::triangle::Triangle;
use glint_core::scene::triangle_uvs;
use glint_core::{
    load_obj, GeometryDesc, LightDesc, SceneDescription, SceneResult, ShapeDesc, Surface,
};
use glint_math::{Camera, Color, DVec3};

/// Build a scene, loading every texture and mesh file it references.
pub fn build_scene(desc: &SceneDescription) -> SceneResult<Scene> {
    let mut scene = Scene::new()
        .with_ambient(desc.ambient.into())
        .with_background(desc.background.into())
        .with_max_rec_level(desc.max_rec_level);
    scene.fog = desc.fog.as_ref().map(|f| Fog {
        color: f.color.into(),
        start: f.start,
        end: f.end,
    });

    let mut texture_ids = Vec::with_capacity(desc.textures.len());
    for path in &desc.textures {
        let resolved = desc.resolve_path(path);
        texture_ids.push(scene.textures.load(&resolved.to_string_lossy())?);
    }

    for light in &desc.lights {
        match light {
            LightDesc::Point {
                position,
                color,
                constant,
                linear,
                quadratic,
            } => scene.add_light(Box::new(
                PointLight::new((*position).into())
                    .with_color((*color).into())
                    .with_falloff(*constant, *linear, *quadratic),
            )),
        }
    }

    let mut builder = ShapeBuilder {
        desc,
        texture_ids: &texture_ids,
        scene: &mut scene,
    };
    let shapes = desc
        .shapes
        .iter()
        .map(|shape| builder.build(shape, None))
        .collect::<SceneResult<Vec<_>>>()?;
    for shape in shapes {
        scene.add_shape(shape);
    }

    log::info!(
        "Built scene: {} shapes, {} lights, {} materials, {} textures",
        scene.shapes().len(),
        scene.lights().len(),
        scene.materials.len(),
        scene.textures.len()
    );
    Ok(scene)
}

struct ShapeBuilder<'d> {
    desc: &'d SceneDescription,
    texture_ids: &'d [usize],
    scene: &'d mut Scene,
}

impl ShapeBuilder<'_> {
    /// Build one node. Children without a surface of their own inherit
    /// their parent's.
    fn build(&mut self, node: &ShapeDesc, inherited: Option<&Surface>) -> SceneResult<Box<dyn Shape>> {
        let own = node
            .surface
            .as_ref()
            .map(|s| s.to_surface(self.texture_ids))
            .transpose()?;
        let surface = own.as_ref().or(inherited);

        let mut shape: Box<dyn Shape> = match &node.geometry {
            GeometryDesc::Plane { normal, point } => {
                Plane::new((*normal).into(), (*point).into()).boxed()
            }
            GeometryDesc::Sphere { center, radius } => {
                Sphere::new((*center).into(), *radius).boxed()
            }
            GeometryDesc::Box { min, max } => AxisBox::new((*min).into(), (*max).into()).boxed(),
            GeometryDesc::Triangle { vertices, uvs } => {
                Triangle::with_uvs(vertices.map(DVec3::from), triangle_uvs(uvs)).boxed()
            }
            GeometryDesc::Torus {
                major_radius,
                minor_radius,
            } => Torus::new(DVec3::ZERO, *major_radius, *minor_radius).boxed(),
            GeometryDesc::Mesh { path } => self.mesh(path)?,
            GeometryDesc::Union { a, b } => {
                Union::new(self.build(a, surface)?, self.build(b, surface)?).boxed()
            }
            GeometryDesc::Intersection { a, b } => {
                Intersection::new(self.build(a, surface)?, self.build(b, surface)?).boxed()
            }
            GeometryDesc::Subtrack { a, b } => {
                Subtrack::new(self.build(a, surface)?, self.build(b, surface)?).boxed()
            }
            GeometryDesc::Clip { a, b } => {
                Clip::new(self.build(a, surface)?, self.build(b, surface)?).boxed()
            }
            GeometryDesc::Bound { bound, shape } => {
                Bound::new(self.build(shape, surface)?, self.build(bound, surface)?).boxed()
            }
        };

        let attributes = shape.attributes_mut();
        if let Some(surface) = surface {
            attributes.surface = surface.clone();
            // A surface given in the scene file wins over OBJ materials
            attributes.material = None;
        }
        if node.mode {
            attributes.uses_mode = true;
        }
        if node.transform.is_some() {
            attributes.transform = Transform::new(node.matrix());
        }

        Ok(shape)
    }

    /// Load an OBJ file. Files with several models become a union.
    fn mesh(&mut self, path: &str) -> SceneResult<Box<dyn Shape>> {
        let resolved = self.desc.resolve_path(path);
        let meshes = load_obj(&resolved, &mut self.scene.materials, &mut self.scene.textures)?;

        let mut shapes = meshes.iter().map(|m| MeshShape::new(m).boxed());
        let first = shapes.next().ok_or_else(|| glint_core::SceneError::InvalidGeometry {
            shape: "mesh",
            reason: format!("{} has no triangles", resolved.display()),
        })?;
        Ok(shapes.fold(first, |acc, next| Union::new(acc, next).boxed()))
    }
}

/// Camera used by the demo scene.
pub fn demo_camera(width: u32, height: u32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(DVec3::splat(3.0), DVec3::ZERO, DVec3::Y)
}

/// Checkerboard floor, a gold box and one point light.
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();

    scene.add_shape(
        Plane::new(DVec3::Y, DVec3::new(0.0, -1.0, 0.0))
            .with_mode(true)
            .boxed(),
    );
    scene.add_shape(
        AxisBox::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::new(-2.0, 1.0, 1.0))
            .with_surface(Surface::gold())
            .boxed(),
    );
    scene.add_light(Box::new(
        PointLight::new(DVec3::new(3.5, 5.0, 5.0))
            .with_color(Color::ONE)
            .with_falloff(0.7, 0.1, 0.1),
    ));

    scene
}
