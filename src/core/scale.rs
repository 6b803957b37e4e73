use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Affine map from a data domain onto a pixel range.
///
/// The range may be descending (y axes map larger values upward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        let (domain_start, domain_end) = domain;
        let (range_start, range_end) = range;
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// `true` when larger domain values map to larger range values.
    #[must_use]
    pub fn is_increasing(self) -> bool {
        (self.domain_end > self.domain_start) == (self.range_end >= self.range_start)
    }

    #[must_use]
    pub fn scale(self, value: f64) -> f64 {
        let t = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + t * (self.range_end - self.range_start)
    }

    /// Inverse of [`LinearScale::scale`]. A zero-width range maps to the domain start.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return self.domain_start;
        }
        let t = (pixel - self.range_start) / range_span;
        self.domain_start + t * (self.domain_end - self.domain_start)
    }

    /// Domain values covering the pixel interval, ordered ascending.
    #[must_use]
    pub fn invert_interval(self, pixel_a: f64, pixel_b: f64) -> (f64, f64) {
        let a = self.invert(pixel_a);
        let b = self.invert(pixel_b);
        if a <= b { (a, b) } else { (b, a) }
    }
}
