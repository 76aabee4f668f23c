//! Light sources.

use glint_math::{Color, DVec3};

/// What a light contributes at a surface point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightSample {
    /// Distance falloff in `[0, 1]`
    pub attenuation: f64,
    /// Unit vector from the point towards the light
    pub direction: DVec3,
    /// Euclidean distance to the light
    pub distance: f64,
    pub color: Color,
}

/// Trait for light sources.
pub trait Light: Send + Sync {
    /// Sample the light as seen from `p`.
    fn shadow(&self, p: DVec3) -> LightSample;
}

/// Point light with constant, linear and quadratic falloff.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: DVec3,
    pub color: Color,
    pub cc: f64,
    pub cl: f64,
    pub cq: f64,
}

impl PointLight {
    /// White light with no falloff.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            color: Color::ONE,
            cc: 1.0,
            cl: 0.0,
            cq: 0.0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_falloff(mut self, cc: f64, cl: f64, cq: f64) -> Self {
        self.cc = cc;
        self.cl = cl;
        self.cq = cq;
        self
    }
}

impl Light for PointLight {
    fn shadow(&self, p: DVec3) -> LightSample {
        let to_light = self.position - p;
        let distance = to_light.length();
        let falloff = self.cc + self.cl * distance + self.cq * distance * distance;
        let attenuation = if falloff > 0.0 {
            (1.0 / falloff).min(1.0)
        } else {
            1.0
        };

        LightSample {
            attenuation,
            direction: to_light.normalize_or_zero(),
            distance,
            color: self.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_light_sample() {
        let light = PointLight::new(DVec3::new(0.0, 3.0, 4.0)).with_falloff(0.7, 0.1, 0.1);
        let sample = light.shadow(DVec3::ZERO);

        assert!((sample.distance - 5.0).abs() < 1e-12);
        assert!((sample.direction - DVec3::new(0.0, 0.6, 0.8)).length() < 1e-12);
        assert!((sample.attenuation - 1.0 / 3.7).abs() < 1e-12);
        assert_eq!(sample.color, Color::ONE);
    }

    #[test]
    fn test_attenuation_clamped() {
        let light = PointLight::new(DVec3::X).with_falloff(0.1, 0.0, 0.0);
        assert_eq!(light.shadow(DVec3::ZERO).attenuation, 1.0);
    }
}
