use std::ops::Range;

use crate::core::series_store::{OhlcColumns, PointColumns, PointView, SeriesColumns};

/// First index whose value is `>= target`. Input must be sorted ascending.
#[must_use]
pub fn lower_bound(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|value| *value < target)
}

/// First index whose value is `> target`. Input must be sorted ascending.
#[must_use]
pub fn upper_bound(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|value| *value <= target)
}

/// Index range of values inside the inclusive window `[min, max]`.
///
/// Two binary searches, O(log n). A reversed window is normalized first.
#[must_use]
pub fn visible_index_range(sorted: &[f64], min: f64, max: f64) -> Range<usize> {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let start = lower_bound(sorted, min);
    let end = upper_bound(sorted, max).max(start);
    start..end
}

/// Expands `[min, max]` by `fraction` of its span on each side.
#[must_use]
pub fn buffered_window(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = max - min;
    if !span.is_finite() || !fraction.is_finite() || fraction <= 0.0 {
        return (min, max);
    }
    let pad = span * fraction;
    (min - pad, max + pad)
}

#[must_use]
pub fn slice_point_view<'a>(view: PointView<'a>, min: f64, max: f64) -> PointView<'a> {
    let range = visible_index_range(&view.x[..view.len()], min, max);
    view.sub(range)
}

#[must_use]
pub fn slice_points(columns: &PointColumns, min: f64, max: f64) -> PointColumns {
    slice_point_view(columns.view(), min, max).to_columns()
}

#[must_use]
pub fn slice_candles(columns: &OhlcColumns, min: f64, max: f64) -> OhlcColumns {
    let range = visible_index_range(columns.timestamps(), min, max);
    columns.slice(range)
}

/// Slices any Cartesian layout by its x/timestamp column. Pie data passes through.
#[must_use]
pub fn slice_series(columns: &SeriesColumns, min: f64, max: f64) -> SeriesColumns {
    match columns {
        SeriesColumns::Points(points) => SeriesColumns::Points(slice_points(points, min, max)),
        SeriesColumns::Ohlc(candles) => SeriesColumns::Ohlc(slice_candles(candles, min, max)),
        SeriesColumns::Pie(slices) => SeriesColumns::Pie(slices.clone()),
    }
}
