use crate::{DVec3, Interval, Ray};

/// Axis-Aligned Bounding Box for the mesh acceleration tree and box primitives.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Box holding no points; the starting value for [`Aabb::grow`] folds.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: DVec3, b: DVec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self { x, y, z }
    }

    /// Smallest AABB holding every point of the iterator.
    pub fn from_iter_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        points
            .into_iter()
            .fold(Aabb::EMPTY, |acc, p| acc.grow(p))
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Extend the box so that it holds `p`.
    pub fn grow(&self, p: DVec3) -> Self {
        Self {
            x: self.x.including(p.x),
            y: self.y.including(p.y),
            z: self.z.including(p.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn with_axis_interval(mut self, n: usize, interval: Interval) -> Self {
        match n {
            0 => self.x = interval,
            1 => self.y = interval,
            _ => self.z = interval,
        }
        self
    }

    /// Split the box at the midpoint of an axis into a "less" and a "more" half.
    pub fn split(&self, axis: usize) -> (Aabb, Aabb) {
        let interval = self.axis_interval(axis);
        let mid = interval.midpoint();
        let less = self.with_axis_interval(axis, Interval::new(interval.min, mid));
        let more = self.with_axis_interval(axis, Interval::new(mid, interval.max));
        (less, more)
    }

    /// Box grown by `delta` on every side.
    pub fn padded(&self, delta: f64) -> Aabb {
        Aabb {
            x: self.x.widened(delta),
            y: self.y.widened(delta),
            z: self.z.widened(delta),
        }
    }

    /// Inclusive point containment.
    pub fn contains(&self, p: DVec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Point containment that accepts points up to `tolerance` outside a face.
    pub fn contains_with(&self, p: DVec3, tolerance: f64) -> bool {
        self.x.contains_with(p.x, tolerance)
            && self.y.contains_with(p.y, tolerance)
            && self.z.contains_with(p.z, tolerance)
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method. Touching a face counts as a hit so that
    /// flat boxes (planar meshes) are still reachable.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return false;
            }
        }

        true
    }

}
