//! Linear scales with the same degenerate-domain behaviour as d3.

/// Maps a numeric domain onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map `value` from domain to range. Values outside the domain extrapolate.
    ///
    /// A zero-extent domain maps everything to the middle of the range.
    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let extent = d1 - d0;
        let t = if extent.abs() > f64::EPSILON {
            (value - d0) / extent
        } else {
            0.5
        };
        r0 + t * (r1 - r0)
    }

    /// Inverse of [`apply`](Self::apply).
    pub fn invert(&self, pixel: f64) -> f64 {
        let inverse = Self::new(self.range, self.domain);
        inverse.apply(pixel)
    }
}

/// `d3.range(start, stop, step)`: `start, start + step, ...` strictly below `stop`.
pub fn range_values(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let count = ((stop - start) / step).ceil();
    if count <= 0.0 || !count.is_finite() {
        return Vec::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = count.min(10_000.0) as usize;
    (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let i = i as f64;
            start + i * step
        })
        .collect()
}

/// Round `max` up to the next multiple of `unit`.
pub fn nice_upper(max: f64, unit: f64) -> f64 {
    if unit <= 0.0 {
        return max;
    }
    let upper = (max / unit).ceil() * unit;
    // -0.0 from ceil on (-1, 0) would print as "-0"
    if upper == 0.0 {
        0.0
    } else {
        upper
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_and_invert() {
        let s = LinearScale::new((0.0, 1000.0), (40.0, 480.0));
        assert_eq!(s.apply(0.0), 40.0);
        assert_eq!(s.apply(500.0), 260.0);
        assert_eq!(s.apply(1000.0), 480.0);
        assert!((s.invert(260.0) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_range() {
        let s = LinearScale::new((0.0, 10.0), (370.0, 20.0));
        assert_eq!(s.apply(0.0), 370.0);
        assert_eq!(s.apply(10.0), 20.0);
        assert_eq!(s.apply(5.0), 195.0);
    }

    #[test]
    fn test_degenerate_domain_is_midpoint() {
        let s = LinearScale::new((0.0, 0.0), (5.0, 30.0));
        assert_eq!(s.apply(0.0), 17.5);
        assert_eq!(s.apply(99.0), 17.5);
    }

    #[test]
    fn test_range_values() {
        assert_eq!(range_values(0.0, 300.0, 100.0), vec![0.0, 100.0, 200.0]);
        assert_eq!(range_values(0.0, 11.0, 1.0).len(), 11);
        assert!(range_values(0.0, 0.0, 100.0).is_empty());
        assert!(range_values(0.0, 10.0, 0.0).is_empty());
    }

    #[test]
    fn test_nice_upper() {
        assert_eq!(nice_upper(1.0, 100.0), 100.0);
        assert_eq!(nice_upper(100.0, 100.0), 100.0);
        assert_eq!(nice_upper(101.0, 100.0), 200.0);
        assert_eq!(nice_upper(-50.0, 100.0), 0.0);
        assert!(nice_upper(-50.0, 100.0).is_sign_positive());
    }
}
