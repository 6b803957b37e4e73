use serde::{Deserialize, Serialize};

/// Normalized data bounds: `x_min < x_max` and `y_min < y_max` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    #[must_use]
    pub fn x_domain(self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    #[must_use]
    pub fn y_domain(self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }
}

/// Degenerate or empty domains fall back to `[v, v + 1]`.
#[must_use]
pub fn normalize_domain(min: f64, max: f64) -> (f64, f64) {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if !min.is_finite() || !max.is_finite() {
        let anchor = if min.is_finite() {
            min
        } else if max.is_finite() {
            max
        } else {
            0.0
        };
        return (anchor, anchor + 1.0);
    }
    if min < max { (min, max) } else { (min, min + 1.0) }
}

/// Raw running extent. Kept un-normalized so incremental extension never
/// inherits the `+1` fallback of a previously degenerate domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self::empty()
    }
}

impl Extent {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Extends with one sample; samples with a non-finite coordinate are skipped.
    pub fn include(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Extends with a candle; y uses both `low` and `high` whatever their order.
    pub fn include_span(&mut self, x: f64, y_a: f64, y_b: f64) {
        if !x.is_finite() || !y_a.is_finite() || !y_b.is_finite() {
            return;
        }
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y_a.min(y_b));
        self.y_max = self.y_max.max(y_a.max(y_b));
    }

    pub fn merge(&mut self, other: &Extent) {
        self.x_min = self.x_min.min(other.x_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_min = self.y_min.min(other.y_min);
        self.y_max = self.y_max.max(other.y_max);
    }

    pub fn include_columns(&mut self, xs: &[f64], ys: &[f64]) {
        for (x, y) in xs.iter().zip(ys) {
            self.include(*x, *y);
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_empty() {
            return None;
        }
        let (x_min, x_max) = normalize_domain(self.x_min, self.x_max);
        let (y_min, y_max) = normalize_domain(self.y_min, self.y_max);
        Some(Bounds {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_sample_gets_unit_span() {
        let mut extent = Extent::empty();
        extent.include(5.0, 7.0);
        let bounds = extent.bounds().expect("bounds");
        assert_eq!(bounds.x_domain(), (5.0, 6.0));
        assert_eq!(bounds.y_domain(), (7.0, 8.0));
    }

    #[test]
    fn extension_after_degenerate_domain_uses_raw_extent() {
        let mut extent = Extent::empty();
        extent.include(1.0, 1.0);
        extent.include(1.5, 1.25);
        let bounds = extent.bounds().expect("bounds");
        assert_eq!(bounds.x_domain(), (1.0, 1.5));
        assert_eq!(bounds.y_domain(), (1.0, 1.25));
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let mut extent = Extent::empty();
        extent.include(f64::NAN, 1.0);
        extent.include(2.0, f64::INFINITY);
        assert!(extent.bounds().is_none());
    }

    #[test]
    fn candle_span_takes_min_max_of_swapped_low_high() {
        let mut extent = Extent::empty();
        extent.include_span(0.0, 12.0, 8.0);
        extent.include_span(1.0, 9.0, 14.0);
        let bounds = extent.bounds().expect("bounds");
        assert_eq!(bounds.y_domain(), (8.0, 14.0));
    }
}
