use crate::DVec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length: rays carried into a
/// shape's local space keep the scale of the inverse transform, so the
/// parameter `t` stays comparable between world and object space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> DVec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> DVec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Same ray with a unit-length direction, plus the original direction length.
    ///
    /// Solvers that assume a unit direction divide their root by the returned
    /// length to get back to this ray's parametrisation.
    pub fn normalized(&self) -> (Ray, f64) {
        let len = self.direction.length();
        if len == 0.0 {
            return (*self, 1.0);
        }
        (Ray::new(self.origin, self.direction / len), len)
    }
}
