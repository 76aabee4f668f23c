//! Spatial partition tree over mesh triangles.
//!
//! Each node splits its box at the midpoint of one axis (cycling X, Y, Z
//! with depth) into a "less" and a "more" half. A triangle moves into a
//! half only when all three of its vertices lie inside that half; triangles
//! straddling the split stay at the node. Children exist only when they
//! received triangles.

use crate::triangle::Polygon;
use glint_math::{Aabb, Interval, Ray, THRESHOLD};

/// Maximum depth of the tree. Nodes at this depth keep all their triangles.
pub const MAX_TREE_DEPTH: usize = 8;

/// A triangle hit found in the tree.
#[derive(Clone, Copy, Debug)]
pub struct TreeHit<'a> {
    pub t: f64,
    /// Barycentric weights of the second and third vertex
    pub u: f64,
    pub v: f64,
    pub polygon: &'a Polygon,
}

/// Shape statistics of a built tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub triangles: usize,
    pub max_depth: usize,
    /// Largest triangle list held by one node
    pub max_node_triangles: usize,
}

/// Node of the mesh partition tree.
pub struct MeshNode {
    bounds: Aabb,
    depth: usize,
    triangles: Vec<Polygon>,
    less: Option<Box<MeshNode>>,
    more: Option<Box<MeshNode>>,
}

impl MeshNode {
    /// Build a tree over a triangle list.
    pub fn build(triangles: Vec<Polygon>) -> Self {
        let bounds = triangles
            .iter()
            .fold(Aabb::EMPTY, |acc, t| Aabb::surrounding(&acc, &t.bounds()));
        Self::build_node(triangles, bounds, 0)
    }

    fn build_node(triangles: Vec<Polygon>, bounds: Aabb, depth: usize) -> Self {
        if depth >= MAX_TREE_DEPTH || triangles.len() <= 1 {
            return Self {
                bounds,
                depth,
                triangles,
                less: None,
                more: None,
            };
        }

        let (less_bounds, more_bounds) = bounds.split(depth % 3);
        // Tolerant on both sides of the box, so vertices on a face still fit
        let inside = |b: &Aabb, t: &Polygon| {
            t.vertices()
                .iter()
                .all(|v| b.contains_with(*v, THRESHOLD))
        };

        let mut less = Vec::new();
        let mut more = Vec::new();
        let mut kept = Vec::new();
        for triangle in triangles {
            if inside(&less_bounds, &triangle) {
                less.push(triangle);
            } else if inside(&more_bounds, &triangle) {
                more.push(triangle);
            } else {
                kept.push(triangle);
            }
        }

        let child = |list: Vec<Polygon>, b: Aabb| {
            (!list.is_empty()).then(|| Box::new(Self::build_node(list, b, depth + 1)))
        };

        Self {
            bounds,
            depth,
            triangles: kept,
            less: child(less, less_bounds),
            more: child(more, more_bounds),
        }
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Triangles held directly by this node.
    pub fn local_triangles(&self) -> &[Polygon] {
        &self.triangles
    }

    fn children(&self) -> impl Iterator<Item = &MeshNode> {
        self.less.iter().chain(self.more.iter()).map(Box::as_ref)
    }

    /// Whether the ray passes through this node's box before `max_t`.
    fn box_hit(&self, ray: &Ray, max_t: f64) -> bool {
        self.bounds
            .padded(THRESHOLD)
            .hit(ray, Interval::new(0.0, max_t))
    }

    /// Nearest triangle hit.
    pub fn intersect(&self, ray: &Ray) -> Option<TreeHit<'_>> {
        if !self.box_hit(ray, f64::INFINITY) {
            return None;
        }
        self.intersect_inner(ray, None)
    }

    fn intersect_inner<'a>(&'a self, ray: &Ray, mut best: Option<TreeHit<'a>>) -> Option<TreeHit<'a>> {
        for child in self.children() {
            let limit = best.map_or(f64::INFINITY, |b| b.t);
            if child.box_hit(ray, limit) {
                best = child.intersect_inner(ray, best);
            }
        }

        for polygon in &self.triangles {
            if let Some((t, u, v)) = polygon.intersect(ray) {
                if best.map_or(true, |b| t < b.t) {
                    best = Some(TreeHit { t, u, v, polygon });
                }
            }
        }

        best
    }

    /// Every triangle hit, in traversal order.
    pub fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<TreeHit<'a>>) {
        if self.box_hit(ray, f64::INFINITY) {
            self.all_intersect_inner(ray, hits);
        }
    }

    fn all_intersect_inner<'a>(&'a self, ray: &Ray, hits: &mut Vec<TreeHit<'a>>) {
        for child in self.children() {
            if child.box_hit(ray, f64::INFINITY) {
                child.all_intersect_inner(ray, hits);
            }
        }

        for polygon in &self.triangles {
            if let Some((t, u, v)) = polygon.intersect(ray) {
                hits.push(TreeHit { t, u, v, polygon });
            }
        }
    }

    /// Total triangles stored in this subtree.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() + self.children().map(MeshNode::triangle_count).sum::<usize>()
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: 1,
            triangles: self.triangles.len(),
            max_depth: self.depth,
            max_node_triangles: self.triangles.len(),
        };
        for child in self.children() {
            let c = child.stats();
            stats.nodes += c.nodes;
            stats.triangles += c.triangles;
            stats.max_depth = stats.max_depth.max(c.max_depth);
            stats.max_node_triangles = stats.max_node_triangles.max(c.max_node_triangles);
        }
        stats
    }
}
