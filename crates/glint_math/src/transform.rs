// Transform utilities for DMat4
//
// glam::DMat4 already provides transform_point3() and transform_vector3();
// shapes only need an inverse that never produces NaNs.

use glam::DMat4;

/// Extension trait for DMat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Inverse of the matrix, or identity when the matrix is singular.
    fn safe_inverse(&self) -> DMat4;

    /// True when the matrix has no usable inverse.
    fn is_singular(&self) -> bool;
}

impl Mat4Ext for DMat4 {
    fn safe_inverse(&self) -> DMat4 {
        if self.is_singular() {
            return DMat4::IDENTITY;
        }
        self.inverse()
    }

    fn is_singular(&self) -> bool {
        let det = self.determinant();
        det == 0.0 || !det.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_safe_inverse_regular() {
        let mat = DMat4::from_translation(DVec3::new(10.0, 20.0, 30.0));
        let inv = mat.safe_inverse();

        let point = DVec3::new(1.0, 2.0, 3.0);
        let back = inv.transform_point3(mat.transform_point3(point));
        assert!((back - point).length() < 1e-9);
    }

    #[test]
    fn test_safe_inverse_singular_is_identity() {
        let mat = DMat4::from_scale(DVec3::new(1.0, 0.0, 1.0));
        assert!(mat.is_singular());
        assert_eq!(mat.safe_inverse(), DMat4::IDENTITY);
        assert_eq!(DMat4::ZERO.safe_inverse(), DMat4::IDENTITY);
    }

    #[test]
    fn test_inverse_transpose_keeps_normals_perpendicular() {
        // A 45 degree slope stretched along X keeps its normal perpendicular
        let mat = DMat4::from_scale(DVec3::new(2.0, 1.0, 1.0));
        let tangent = DVec3::new(1.0, 1.0, 0.0);
        let normal = DVec3::new(1.0, -1.0, 0.0);

        let t = mat.transform_vector3(tangent);
        let n = mat.safe_inverse().transpose().transform_vector3(normal);
        assert!(t.dot(n).abs() < 1e-9);
    }
}
