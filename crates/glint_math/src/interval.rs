/// A closed range of reals, used for box slabs and ray parameter windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Holds nothing; growing it by any value gives a single-point range.
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive containment.
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Containment that also accepts values up to `tolerance` outside either end.
    pub fn contains_with(&self, x: f64, tolerance: f64) -> bool {
        x - self.min > -tolerance && x - self.max < tolerance
    }

    /// Smallest range holding both this one and `x`.
    pub fn including(&self, x: f64) -> Interval {
        Interval::new(self.min.min(x), self.max.max(x))
    }

    /// Range widened by `delta` at both ends.
    pub fn widened(&self, delta: f64) -> Interval {
        Interval::new(self.min - delta, self.max + delta)
    }

    pub fn midpoint(&self) -> f64 {
        self.min * 0.5 + self.max * 0.5
    }

    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}
