//! Triangle mesh shape backed by a [`MeshNode`] tree.

use crate::hit::HitRecord;
use crate::mesh_tree::{MeshNode, TreeStats};
use crate::shape::{Shape, ShapeAttributes};
use crate::triangle::{textured_color, Polygon};
use glint_core::{Mesh, Surface, TextureRegistry};
use glint_math::{Color, DVec3, Ray};

/// Direction of the containment parity ray. Tilted off +Y so that it does
/// not run along the shared edges and diagonals of axis-aligned geometry,
/// where the edge-exclusive triangle test would drop the crossing.
const PARITY_DIRECTION: DVec3 = DVec3::new(0.012_345_678_9, 1.0, 0.007_654_321_3);

/// A triangle mesh.
///
/// Meshes colour their diffuse term from texture slot 0 when one is set,
/// so `uses_mode` starts enabled.
pub struct MeshShape {
    tree: MeshNode,
    attributes: ShapeAttributes,
}

impl MeshShape {
    /// Build the mesh tree from loaded mesh data.
    pub fn new(mesh: &Mesh) -> Self {
        let polygons: Vec<Polygon> = mesh
            .triangles()
            .into_iter()
            .map(|t| Polygon::new(t.positions, t.uvs))
            .collect();
        Self::from_polygons(polygons, mesh.material)
    }

    pub fn from_polygons(polygons: Vec<Polygon>, material: Option<usize>) -> Self {
        let tree = MeshNode::build(polygons);
        let stats = tree.stats();
        log::debug!(
            "Mesh tree: {} triangles in {} nodes, depth {}, largest node {}",
            stats.triangles,
            stats.nodes,
            stats.max_depth,
            stats.max_node_triangles
        );

        let mut attributes = ShapeAttributes::default();
        attributes.uses_mode = true;
        attributes.material = material;

        Self { tree, attributes }
    }

    pub fn triangle_count(&self) -> usize {
        self.tree.triangle_count()
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }

    pub fn tree(&self) -> &MeshNode {
        &self.tree
    }

    fn record<'a>(&'a self, ray: &Ray, t: f64, u: f64, v: f64, polygon: &'a Polygon) -> HitRecord<'a> {
        let mut hit = HitRecord::at(self, t);
        hit.set_geometry(ray.at(t), polygon.normal(), ray.direction());
        hit.doubles = [u, v];
        hit.polygon = Some(polygon);
        hit
    }
}

impl Shape for MeshShape {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let Some(found) = self.tree.intersect(ray) else {
            return false;
        };

        *hit = self.record(ray, found.t, found.u, found.v, found.polygon);
        true
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        let mut found = Vec::new();
        self.tree.all_intersect(ray, &mut found);
        hits.extend(
            found
                .into_iter()
                .map(|h| self.record(ray, h.t, h.u, h.v, h.polygon)),
        );
    }

    /// Parity of crossings along a near-+Y ray. Only meaningful for closed meshes.
    fn is_inside(&self, p: DVec3) -> bool {
        let mut found = Vec::new();
        self.tree.all_intersect(&Ray::new(p, PARITY_DIRECTION), &mut found);
        found.len() % 2 == 1
    }

    fn normal(&self, hit: &HitRecord) -> DVec3 {
        hit.polygon.map_or(hit.n, Polygon::normal)
    }

    fn mode(&self, hit: &HitRecord, surface: &Surface, textures: &TextureRegistry) -> Color {
        match hit.polygon {
            Some(polygon) => textured_color(polygon, hit, surface, textures),
            None => surface.kd,
        }
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "mesh"
    }
}
