//! Shape trait, per-shape attributes and object-space transforms.

use crate::hit::HitRecord;
use glint_core::{Surface, TextureRegistry};
use glint_math::{Color, DMat4, DVec3, Mat4Ext, Ray};

/// Object-to-world matrix with its inverse computed eagerly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    matrix: DMat4,
    inverse: DMat4,
    /// Inverse-transpose, for normals
    normal_matrix: DMat4,
    identity: bool,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        matrix: DMat4::IDENTITY,
        inverse: DMat4::IDENTITY,
        normal_matrix: DMat4::IDENTITY,
        identity: true,
    };

    /// Create a transform. A singular matrix gets an identity inverse.
    pub fn new(matrix: DMat4) -> Self {
        if matrix.is_singular() {
            log::warn!("Singular shape transform, using identity inverse");
        }
        let inverse = matrix.safe_inverse();
        Self {
            matrix,
            inverse,
            normal_matrix: inverse.transpose(),
            identity: matrix == DMat4::IDENTITY,
        }
    }

    pub fn matrix(&self) -> DMat4 {
        self.matrix
    }

    pub fn inverse(&self) -> DMat4 {
        self.inverse
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    /// Carry a world ray into object space. The parametrisation is kept, so
    /// `t` values found in object space are valid in world space.
    pub fn ray_to_local(&self, ray: &Ray) -> Ray {
        if self.identity {
            return *ray;
        }
        Ray::new(
            self.inverse.transform_point3(ray.origin()),
            self.inverse.transform_vector3(ray.direction()),
        )
    }

    pub fn point_to_local(&self, p: DVec3) -> DVec3 {
        if self.identity {
            return p;
        }
        self.inverse.transform_point3(p)
    }

    /// Carry a hit's point and normal back to world space.
    pub fn hit_to_world(&self, hit: &mut HitRecord) {
        if self.identity {
            return;
        }
        hit.p = self.matrix.transform_point3(hit.p);
        hit.n = self.normal_matrix.transform_vector3(hit.n);
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Attributes every shape carries.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeAttributes {
    pub transform: Transform,
    pub surface: Surface,
    /// Colour diffuse light with [`Shape::mode`] instead of the flat `kd`
    pub uses_mode: bool,
    /// Material registry index overriding `surface`
    pub material: Option<usize>,
}

impl ShapeAttributes {
    pub fn new(surface: Surface) -> Self {
        Self {
            transform: Transform::IDENTITY,
            surface,
            uses_mode: false,
            material: None,
        }
    }
}

impl Default for ShapeAttributes {
    fn default() -> Self {
        Self::new(Surface::default())
    }
}

/// Trait for everything that can be intersected.
///
/// All queries are in the shape's local space; see [`intersect_world`] and
/// friends for the transformed versions.
pub trait Shape: Send + Sync {
    /// Nearest hit beyond the threshold.
    ///
    /// Returns true if hit, and fills in the hit record.
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool;

    /// Append every crossing of the ray with the surface.
    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>);

    /// Whether a point lies inside the solid.
    fn is_inside(&self, p: DVec3) -> bool;

    /// Whether the ray hits at all.
    fn is_intersect(&self, ray: &Ray) -> bool {
        let mut hit = HitRecord::default();
        self.intersect(ray, &mut hit)
    }

    /// Outward normal at a hit produced by this shape.
    fn normal(&self, hit: &HitRecord) -> DVec3;

    /// Procedural diffuse colour at a world-space hit.
    fn mode(&self, _hit: &HitRecord, surface: &Surface, _textures: &TextureRegistry) -> Color {
        surface.kd
    }

    fn attributes(&self) -> &ShapeAttributes;

    fn attributes_mut(&mut self) -> &mut ShapeAttributes;

    /// Short type name for logging.
    fn name(&self) -> &'static str;
}

/// Builder methods for any shape.
pub trait ShapeExt: Shape + Sized {
    fn with_matrix(mut self, matrix: DMat4) -> Self {
        self.attributes_mut().transform = Transform::new(matrix);
        self
    }

    fn with_surface(mut self, surface: Surface) -> Self {
        self.attributes_mut().surface = surface;
        self
    }

    fn with_mode(mut self, uses_mode: bool) -> Self {
        self.attributes_mut().uses_mode = uses_mode;
        self
    }

    fn with_material(mut self, material: usize) -> Self {
        self.attributes_mut().material = Some(material);
        self
    }

    fn boxed(self) -> Box<dyn Shape>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: Shape + Sized> ShapeExt for T {}

/// Nearest hit of a shape queried with a ray in its parent's space.
pub fn intersect_world<'a>(shape: &'a dyn Shape, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
    let local = shape.attributes().transform.ray_to_local(ray);
    if !shape.intersect(&local, hit) {
        return false;
    }
    to_parent(shape, hit);
    true
}

/// All hits of a shape queried with a ray in its parent's space.
pub fn all_intersect_world<'a>(shape: &'a dyn Shape, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
    let local = shape.attributes().transform.ray_to_local(ray);
    let start = hits.len();
    shape.all_intersect(&local, hits);
    for hit in &mut hits[start..] {
        to_parent(shape, hit);
    }
}

/// Carry a hit found inside `shape` out to its parent's space.
///
/// A material set on an enclosing shape wins over the leaf's, so composites
/// can be assigned a material as a whole.
fn to_parent(shape: &dyn Shape, hit: &mut HitRecord) {
    let attributes = shape.attributes();
    attributes.transform.hit_to_world(hit);
    if attributes.material.is_some() {
        hit.material = attributes.material;
    }
}

/// Containment of a point given in the parent's space.
pub fn is_inside_world(shape: &dyn Shape, p: DVec3) -> bool {
    shape.is_inside(shape.attributes().transform.point_to_local(p))
}

/// Any hit of a shape queried with a ray in its parent's space.
pub fn is_intersect_world(shape: &dyn Shape, ray: &Ray) -> bool {
    shape.is_intersect(&shape.attributes().transform.ray_to_local(ray))
}
