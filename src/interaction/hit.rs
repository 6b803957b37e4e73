use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::windowing::visible_index_range;
use crate::core::{DataPoint, LinearScale, OhlcRecord, PieSlice, SeriesKind};
use crate::render::RenderSeries;

/// Data element carried by a hit so tooltips never reach back into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HitValue {
    Point(DataPoint),
    Candle(OhlcRecord),
    Slice {
        slice: PieSlice,
        /// Share of the series total in `[0, 1]`.
        fraction: f64,
    },
}

/// One resolved element under the pointer.
///
/// `data_index` indexes the rendered (sliced/sampled) data of the frame the
/// hit was resolved against. `anchor` is in the same grid-local pixel space
/// as the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesHit {
    pub series_index: usize,
    pub series_name: Option<String>,
    pub kind: SeriesKind,
    pub data_index: usize,
    pub value: HitValue,
    pub anchor: (f64, f64),
    /// Pointer-to-anchor distance for nearest-style hits.
    pub distance_px: Option<f64>,
}

impl SeriesHit {
    pub(crate) fn new(
        series: &RenderSeries,
        data_index: usize,
        value: HitValue,
        anchor: (f64, f64),
    ) -> Self {
        Self {
            series_index: series.index,
            series_name: series.name.clone(),
            kind: series.kind,
            data_index,
            value,
            anchor,
            distance_px: None,
        }
    }

    #[must_use]
    pub(crate) fn with_distance(mut self, distance_px: f64) -> Self {
        self.distance_px = Some(distance_px);
        self
    }
}

fn default_max_distance_px() -> f64 {
    20.0
}

fn default_symbol_radius_px() -> f64 {
    4.0
}

/// Pixel thresholds shared by the nearest-style hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitTestTuning {
    #[serde(default = "default_max_distance_px")]
    pub max_distance_px: f64,
    #[serde(default = "default_symbol_radius_px")]
    pub default_symbol_radius_px: f64,
}

impl Default for HitTestTuning {
    fn default() -> Self {
        Self {
            max_distance_px: default_max_distance_px(),
            default_symbol_radius_px: default_symbol_radius_px(),
        }
    }
}

/// Indices whose x may fall inside the pixel interval `[px_a, px_b]`.
///
/// Columns holding a non-finite x cannot be binary searched and fall back to
/// the full range; callers re-check every candidate geometrically.
pub(crate) fn candidate_range(
    xs: &[f64],
    has_non_finite: bool,
    x_scale: LinearScale,
    px_a: f64,
    px_b: f64,
) -> Range<usize> {
    if has_non_finite || !x_scale.is_increasing() {
        return 0..xs.len();
    }
    let (min, max) = x_scale.invert_interval(px_a, px_b);
    visible_index_range(xs, min, max)
}

/// Smallest positive pixel distance between consecutive x values, or `fallback`.
pub(crate) fn category_width_px(xs: &[f64], x_scale: LinearScale, fallback: f64) -> f64 {
    let mut best = f64::INFINITY;
    let mut previous: Option<f64> = None;
    for x in xs.iter().copied().filter(|x| x.is_finite()) {
        let px = x_scale.scale(x);
        if let Some(previous) = previous {
            let delta = (px - previous).abs();
            if delta > 0.0 && delta < best {
                best = delta;
            }
        }
        previous = Some(px);
    }
    if best.is_finite() { best } else { fallback }
}
