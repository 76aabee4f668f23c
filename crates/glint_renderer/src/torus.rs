//! Torus primitive.
//!
//! The torus lies in the local XY plane around the Z axis. Ray intersection
//! is a quartic in `t`, solved in closed form: the quartic is depressed, its
//! resolvent cubic is solved with Cardano's formula when it has one real root
//! and with Viète's trigonometric formula when it has three, and the quartic
//! roots follow from the resolvent root. When the linear term vanishes the
//! depressed quartic is biquadratic and is solved directly, since the
//! resolvent route divides by zero there.

use crate::hit::HitRecord;
use crate::shape::{Shape, ShapeAttributes};
use glint_math::{DVec3, Ray, THRESHOLD};

/// Below this the quartic is solved in `1/t` for better conditioning.
const INVERT_THRESHOLD: f64 = THRESHOLD;

/// Below this the depressed quartic is treated as biquadratic.
const BIQUADRATIC_THRESHOLD: f64 = 1e-9;

/// A torus with major radius `R` (centre to tube centre) and minor radius `r`.
pub struct Torus {
    center: DVec3,
    major: f64,
    minor: f64,
    major2: f64,
    minor2: f64,
    attributes: ShapeAttributes,
}

impl Torus {
    pub fn new(center: DVec3, major_radius: f64, minor_radius: f64) -> Self {
        Self {
            center,
            major: major_radius,
            minor: minor_radius,
            major2: major_radius * major_radius,
            minor2: minor_radius * minor_radius,
            attributes: ShapeAttributes::default(),
        }
    }

    pub fn major_radius(&self) -> f64 {
        self.major
    }

    pub fn minor_radius(&self) -> f64 {
        self.minor
    }

    /// Positive roots along a unit-direction ray, unsorted.
    ///
    /// NaN candidates (complex roots) are dropped.
    fn roots(&self, unit: &Ray) -> Vec<f64> {
        let ro = unit.origin() - self.center;
        let rd = unit.direction();
        let (ra2, rb2) = (self.major2, self.minor2);

        let m = ro.length_squared();
        let n = ro.dot(rd);

        // Bounding sphere
        let outer = self.major + self.minor;
        if n * n - m + outer * outer < 0.0 {
            return Vec::new();
        }

        // t^4 + 4 k3 t^3 + 4 k2 t^2 + 8 k1 t + 4 k0
        let k = (m + ra2 - rb2) / 2.0;
        let mut k3 = n;
        let mut k2 = n * n - ra2 * (rd.x * rd.x + rd.y * rd.y) + k;
        let mut k1 = n * k - ra2 * (rd.x * ro.x + rd.y * ro.y);
        let mut k0 = k * k - ra2 * (ro.x * ro.x + ro.y * ro.y);

        // Solve for s = 2/t instead
        let inverted = (k3 * (k3 * k3 - k2) + k1).abs() < INVERT_THRESHOLD;
        if inverted {
            if k0 == 0.0 {
                return Vec::new();
            }
            std::mem::swap(&mut k1, &mut k3);
            k0 = 1.0 / k0;
            k1 *= k0;
            k2 *= k0;
            k3 *= k0;
        }

        let mut c2 = k2 * 2.0 - 3.0 * k3 * k3;
        let mut c1 = k3 * (k3 * k3 - k2) + k1;
        let mut c0 = k3 * (k3 * (c2 + 2.0 * k2) - 8.0 * k1) + 4.0 * k0;
        c2 /= 3.0;
        c1 *= 2.0;
        c0 /= 3.0;

        let candidates: Vec<f64> = if c1.abs() < BIQUADRATIC_THRESHOLD {
            biquadratic(6.0 * c2, 3.0 * c0)
        } else {
            resolvent(c2, c1, c0)
        };

        candidates
            .into_iter()
            .map(|y| y - k3)
            .map(|t| if inverted { 2.0 / t } else { t })
            .filter(|t| t.is_finite() && *t > THRESHOLD)
            .collect()
    }
}

/// Roots of `y^4 + p y^2 + s`.
fn biquadratic(p: f64, s: f64) -> Vec<f64> {
    let disc = p * p - 4.0 * s;
    if disc < 0.0 {
        return Vec::new();
    }

    let sq = disc.sqrt();
    let mut roots = Vec::with_capacity(4);
    for y2 in [(-p - sq) / 2.0, (-p + sq) / 2.0] {
        if y2 >= 0.0 {
            let y = y2.sqrt();
            roots.push(y);
            roots.push(-y);
        }
    }
    roots
}

/// Depressed quartic roots through the resolvent cubic, from the scaled
/// coefficients `c2 = p/6`, `c1 = q/4`, `c0 = s/3`.
fn resolvent(c2: f64, c1: f64, c0: f64) -> Vec<f64> {
    let q = c2 * c2 + c0;
    let r = c2 * c2 * c2 - 3.0 * c2 * c0 + c1 * c1;
    let h = r * r - q * q * q;

    if h >= 0.0 {
        // One real resolvent root: two real quartic roots
        let h = h.sqrt();
        let v = (r + h).cbrt();
        let u = (r - h).cbrt();

        let sx = (v + u) + 4.0 * c2;
        let sy = (v - u) * 3f64.sqrt();
        let y = (0.5 * (sx.hypot(sy) + sx)).sqrt();
        let x = 0.5 * sy / y;
        let rr = 2.0 * c1 / (x * x + y * y);

        return vec![x - rr, -x - rr];
    }

    // Three real resolvent roots: up to four real quartic roots
    let sq = q.sqrt();
    let w = sq * ((-r / (sq * q)).clamp(-1.0, 1.0).acos() / 3.0).cos();
    let d2 = -(w + c2);
    if d2 < 0.0 {
        return Vec::new();
    }

    let d1 = d2.sqrt();
    let h1 = (w - 2.0 * c2 + c1 / d1).sqrt();
    let h2 = (w - 2.0 * c2 - c1 / d1).sqrt();

    vec![-d1 - h1, -d1 + h1, d1 - h2, d1 + h2]
}

impl Torus {
    fn record<'a>(&'a self, ray: &Ray, t: f64) -> HitRecord<'a> {
        let mut hit = HitRecord::at(self, t);
        let p = ray.at(t);
        hit.set_geometry(p, self.gradient(p), ray.direction());
        hit
    }

    /// Outward normal at a surface point, unnormalized.
    fn gradient(&self, p: DVec3) -> DVec3 {
        let q = p - self.center;
        let k = q.length_squared() - self.minor2;
        DVec3::new(
            q.x * (k - self.major2),
            q.y * (k - self.major2),
            q.z * (k + self.major2),
        )
    }
}

impl Shape for Torus {
    fn intersect<'a>(&'a self, ray: &Ray, hit: &mut HitRecord<'a>) -> bool {
        let (unit, len) = ray.normalized();
        let Some(distance) = self.roots(&unit).into_iter().min_by(f64::total_cmp) else {
            return false;
        };

        *hit = self.record(ray, distance / len);
        true
    }

    fn all_intersect<'a>(&'a self, ray: &Ray, hits: &mut Vec<HitRecord<'a>>) {
        let (unit, len) = ray.normalized();
        let mut roots = self.roots(&unit);
        roots.sort_by(f64::total_cmp);
        roots.dedup_by(|a, b| (*a - *b).abs() < THRESHOLD);

        hits.extend(roots.into_iter().map(|d| self.record(ray, d / len)));
    }

    fn is_inside(&self, p: DVec3) -> bool {
        let q = p - self.center;
        let a = q.length_squared() + self.major2 - self.minor2;
        a * a < 4.0 * self.major2 * (q.x * q.x + q.y * q.y)
    }

    fn normal(&self, hit: &HitRecord) -> DVec3 {
        self.gradient(hit.p)
    }

    fn attributes(&self) -> &ShapeAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut ShapeAttributes {
        &mut self.attributes
    }

    fn name(&self) -> &'static str {
        "torus"
    }
}
