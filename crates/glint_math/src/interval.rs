/// A closed range of ray parameters or coordinates.
///
/// `min > max` is the empty interval; intersecting a ray against geometry
/// narrows an interval until it either empties or yields a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Everything past `min`, the usual range for primary and scattered rays.
    #[inline]
    pub const fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// Returns true if x is strictly within (min, max).
    #[inline]
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with `max` lowered to `t`; used to prune farther hits.
    #[inline]
    pub fn with_max(&self, t: f32) -> Interval {
        Interval::new(self.min, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Endpoints are excluded when surrounding
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(0.1));
        assert!(interval.surrounds(9.9));
    }

    #[test]
    fn test_interval_narrowing() {
        let ray_t = Interval::from_min(0.001);
        assert_eq!(ray_t.max, f32::INFINITY);

        let narrowed = ray_t.with_max(4.0);
        assert_eq!(narrowed.min, 0.001);
        assert_eq!(narrowed.max, 4.0);
        assert!(!narrowed.surrounds(4.0));
    }

    #[test]
    fn test_interval_empty() {
        assert!(!Interval::new(1.0, 2.0).is_empty());
        // A single point still counts as non-empty
        assert!(!Interval::new(1.0, 1.0).is_empty());
        assert!(Interval::new(2.0, 1.0).is_empty());
    }
}
