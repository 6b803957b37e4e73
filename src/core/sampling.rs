//! Deterministic decimation of sorted series.
//!
//! Every strategy keeps the first and last sample of its input window so the
//! visible extent of a line never shrinks when it is downsampled.

use serde::{Deserialize, Serialize};

use crate::core::series_store::{OhlcColumns, PointColumns, PointView, SeriesColumns};
use crate::core::types::OhlcRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    #[default]
    None,
    Lttb,
    Average,
    Max,
    Min,
}

/// Limits applied when scaling the sampling budget to the zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingTargetLimits {
    pub max_multiplier: f64,
    pub absolute_cap: usize,
}

impl Default for SamplingTargetLimits {
    fn default() -> Self {
        Self {
            max_multiplier: 32.0,
            absolute_cap: 1_000_000,
        }
    }
}

/// Sampling budget for a zoomed window.
///
/// `target = clamp(round(base / fraction), 2, min(cap, base * multiplier))`.
/// Zooming in (smaller `visible_span_fraction`) lets more raw points survive.
#[must_use]
pub fn effective_sampling_target(
    base_threshold: usize,
    visible_span_fraction: f64,
    limits: SamplingTargetLimits,
) -> usize {
    let base = base_threshold.max(2) as f64;
    let multiplier = if limits.max_multiplier.is_finite() && limits.max_multiplier >= 1.0 {
        limits.max_multiplier
    } else {
        1.0
    };
    let ceiling = (base * multiplier).min(limits.absolute_cap as f64).max(2.0);
    let fraction = if visible_span_fraction.is_finite() {
        visible_span_fraction
    } else {
        1.0
    };
    if fraction <= 0.0 {
        return ceiling as usize;
    }
    let raw = (base / fraction.min(1.0)).round();
    raw.clamp(2.0, ceiling) as usize
}

#[must_use]
pub fn sample_points(view: PointView<'_>, strategy: SamplingStrategy, target: usize) -> PointColumns {
    let len = view.len();
    let target = target.max(2);
    if strategy == SamplingStrategy::None || len <= target {
        return view.to_columns();
    }
    match strategy {
        SamplingStrategy::None => view.to_columns(),
        SamplingStrategy::Lttb => lttb(view, target),
        SamplingStrategy::Average | SamplingStrategy::Max | SamplingStrategy::Min => {
            bucket_reduce(view, strategy, target)
        }
    }
}

/// Bucket aggregation for candles: first open, last close, lowest low,
/// highest high, stamped with the bucket's first timestamp. Wicks survive
/// because extrema are never averaged away.
#[must_use]
pub fn sample_ohlc(columns: &OhlcColumns, target: usize) -> OhlcColumns {
    let len = columns.len();
    let target = target.max(2);
    if len <= target {
        return columns.clone();
    }

    let mut out = OhlcColumns::with_capacity(target);
    let interior = interior_buckets(len, target);
    if let Some(first) = columns.record(0) {
        out.push(first);
    }
    for bucket in interior {
        let mut merged: Option<OhlcRecord> = None;
        for index in bucket {
            let Some(record) = columns.record(index) else {
                continue;
            };
            merged = Some(match merged {
                None => OhlcRecord::new(
                    record.timestamp,
                    record.open,
                    record.close,
                    record.low_bound(),
                    record.high_bound(),
                ),
                Some(acc) => OhlcRecord::new(
                    acc.timestamp,
                    acc.open,
                    record.close,
                    acc.low.min(record.low_bound()),
                    acc.high.max(record.high_bound()),
                ),
            });
        }
        if let Some(record) = merged {
            out.push(record);
        }
    }
    if let Some(last) = columns.record(len - 1) {
        out.push(last);
    }
    out
}

/// Samples any layout with its series strategy. Pie data passes through.
#[must_use]
pub fn sample_series(columns: &SeriesColumns, strategy: SamplingStrategy, target: usize) -> SeriesColumns {
    match columns {
        SeriesColumns::Points(points) => {
            SeriesColumns::Points(sample_points(points.view(), strategy, target))
        }
        SeriesColumns::Ohlc(candles) if strategy != SamplingStrategy::None => {
            SeriesColumns::Ohlc(sample_ohlc(candles, target))
        }
        other => other.clone(),
    }
}

/// Splits the interior `1..len-1` into `target - 2` contiguous buckets.
fn interior_buckets(len: usize, target: usize) -> impl Iterator<Item = std::ops::Range<usize>> {
    let buckets = target.saturating_sub(2);
    let interior = len.saturating_sub(2);
    let size = interior as f64 / buckets.max(1) as f64;
    (0..buckets).filter_map(move |bucket| {
        let start = 1 + (bucket as f64 * size).floor() as usize;
        let end = if bucket + 1 == buckets {
            len - 1
        } else {
            (1 + ((bucket + 1) as f64 * size).floor() as usize).min(len - 1)
        };
        (start < end).then_some(start..end)
    })
}

/// Largest-triangle-three-buckets over parallel columns.
fn lttb(view: PointView<'_>, target: usize) -> PointColumns {
    let len = view.len();
    let (xs, ys) = (view.x, view.y);
    let mut out = PointColumns::with_capacity(target);
    out.push_parts(xs[0], ys[0], view.size_at(0));

    let buckets: Vec<_> = interior_buckets(len, target).collect();
    let mut anchor = 0usize;
    for (i, bucket) in buckets.iter().enumerate() {
        let (avg_x, avg_y) = match buckets.get(i + 1) {
            Some(next) => mean_xy(xs, ys, next.clone()),
            None => (xs[len - 1], ys[len - 1]),
        };
        let (ax, ay) = (xs[anchor], ys[anchor]);
        let mut best_area = -1.0;
        let mut best = bucket.start;
        for j in bucket.clone() {
            let area = ((ax - avg_x) * (ys[j] - ay) - (ax - xs[j]) * (avg_y - ay)).abs();
            // NaN areas never win, so a gap sample can't displace a real one.
            if area > best_area {
                best_area = area;
                best = j;
            }
        }
        out.push_parts(xs[best], ys[best], view.size_at(best));
        anchor = best;
    }

    out.push_parts(xs[len - 1], ys[len - 1], view.size_at(len - 1));
    out
}

fn mean_xy(xs: &[f64], ys: &[f64], range: std::ops::Range<usize>) -> (f64, f64) {
    let count = range.len().max(1) as f64;
    let (mut sx, mut sy) = (0.0, 0.0);
    for i in range {
        sx += xs[i];
        sy += ys[i];
    }
    (sx / count, sy / count)
}

fn bucket_reduce(view: PointView<'_>, strategy: SamplingStrategy, target: usize) -> PointColumns {
    let len = view.len();
    let (xs, ys) = (view.x, view.y);
    let mut out = PointColumns::with_capacity(target);
    out.push_parts(xs[0], ys[0], view.size_at(0));

    for bucket in interior_buckets(len, target) {
        match strategy {
            SamplingStrategy::Average => {
                let (mx, my) = mean_xy(xs, ys, bucket.clone());
                let (mut size_sum, mut size_count) = (0.0, 0usize);
                for i in bucket {
                    if let Some(size) = view.size_at(i) {
                        size_sum += size;
                        size_count += 1;
                    }
                }
                let size = (size_count > 0).then(|| size_sum / size_count as f64);
                out.push_parts(mx, my, size);
            }
            _ => {
                let mut chosen = bucket.start;
                for i in bucket {
                    let better = match strategy {
                        SamplingStrategy::Max => ys[i] > ys[chosen],
                        _ => ys[i] < ys[chosen],
                    };
                    if better || ys[chosen].is_nan() {
                        chosen = i;
                    }
                }
                out.push_parts(xs[chosen], ys[chosen], view.size_at(chosen));
            }
        }
    }

    out.push_parts(xs[len - 1], ys[len - 1], view.size_at(len - 1));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataPoint;

    fn sine(len: usize) -> PointColumns {
        let points: Vec<_> = (0..len)
            .map(|i| DataPoint::new(i as f64, (i as f64 * 0.1).sin()))
            .collect();
        PointColumns::from_points(&points)
    }

    #[test]
    fn lttb_hits_target_and_keeps_endpoints() {
        let columns = sine(1_000);
        let sampled = sample_points(columns.view(), SamplingStrategy::Lttb, 100);
        assert_eq!(sampled.len(), 100);
        assert_eq!(sampled.x()[0], 0.0);
        assert_eq!(sampled.x()[99], 999.0);
    }

    #[test]
    fn sampling_is_deterministic() {
        let columns = sine(500);
        let a = sample_points(columns.view(), SamplingStrategy::Lttb, 40);
        let b = sample_points(columns.view(), SamplingStrategy::Lttb, 40);
        assert_eq!(a, b);
    }

    #[test]
    fn max_strategy_keeps_peaks() {
        let mut points: Vec<_> = (0..100).map(|i| DataPoint::new(i as f64, 0.0)).collect();
        points[50].y = 42.0;
        let columns = PointColumns::from_points(&points);
        let sampled = sample_points(columns.view(), SamplingStrategy::Max, 10);
        assert!(sampled.y().contains(&42.0));
    }

    #[test]
    fn ohlc_sampling_preserves_extreme_wicks() {
        let records: Vec<_> = (0..200)
            .map(|i| {
                let t = i as f64;
                let (low, high) = if i == 77 { (-50.0, 300.0) } else { (9.0, 11.0) };
                OhlcRecord::new(t, 10.0, 10.5, low, high)
            })
            .collect();
        let columns = OhlcColumns::from_records(&records);
        let sampled = sample_ohlc(&columns, 20);
        assert_eq!(sampled.len(), 20);
        let lows: Vec<_> = sampled.iter().map(|r| r.low).collect();
        let highs: Vec<_> = sampled.iter().map(|r| r.high).collect();
        assert!(lows.contains(&-50.0));
        assert!(highs.contains(&300.0));
        assert_eq!(sampled.timestamps()[0], 0.0);
        assert_eq!(sampled.timestamps()[19], 199.0);
    }

    #[test]
    fn zoom_target_scales_inversely_with_span() {
        let limits = SamplingTargetLimits::default();
        assert_eq!(effective_sampling_target(1_000, 1.0, limits), 1_000);
        assert_eq!(effective_sampling_target(1_000, 0.25, limits), 4_000);
        assert_eq!(effective_sampling_target(1_000, 0.0001, limits), 32_000);
        assert_eq!(effective_sampling_target(1_000, 0.0, limits), 32_000);
        assert_eq!(effective_sampling_target(1, 1.0, limits), 2);
    }
}
