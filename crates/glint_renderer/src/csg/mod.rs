//! Constructive solid geometry.
//!
//! Combinators own two child shapes and build their surface purely from
//! the children's [`Shape::all_intersect`] lists filtered by
//! [`Shape::is_inside`]. Children are queried in the combinator's local
//! space, so a child's own transform composes with its parent's.
//!
//! Hits keep a reference to the leaf shape that produced them. Their normal
//! has already been carried out through every child transform, so
//! [`Shape::normal`] on a combinator returns it as is.

mod bound;
mod clip;
mod intersection;
mod subtrack;
mod union;

pub use bound::Bound;
pub use clip::Clip;
pub use intersection::Intersection;
pub use subtrack::Subtrack;
pub use union::Union;

use crate::hit::HitRecord;
use crate::shape::{all_intersect_world, Shape};
use glint_math::{DVec3, Ray};

/// Every hit of a child, in the combinator's space.
fn crossings<'a>(shape: &'a dyn Shape, ray: &Ray) -> Vec<HitRecord<'a>> {
    let mut hits = Vec::new();
    all_intersect_world(shape, ray, &mut hits);
    hits
}

/// Earliest hit, with strict `t` ordering so the first of equal hits wins.
fn earliest<'a>(hits: impl IntoIterator<Item = HitRecord<'a>>) -> Option<HitRecord<'a>> {
    let mut best: Option<HitRecord<'a>> = None;
    for hit in hits {
        if best.map_or(true, |b| hit.t < b.t) {
            best = Some(hit);
        }
    }
    best
}

/// Normal of a hit found through a child, in the combinator's space.
fn leaf_normal(hit: &HitRecord) -> DVec3 {
    hit.n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_keeps_first_of_ties() {
        let hits = [2.0, 1.0, 1.0, 3.0].map(|t| HitRecord {
            t,
            ..HitRecord::default()
        });
        let best = earliest(hits.iter().copied().enumerate().map(|(i, mut h)| {
            h.ints[0] = i as i64;
            h
        }));

        let best = best.unwrap();
        assert!((best.t - 1.0).abs() < 1e-12);
        assert_eq!(best.ints[0], 1);
    }

    #[test]
    fn test_earliest_of_nothing() {
        assert!(earliest(Vec::new()).is_none());
    }
}
