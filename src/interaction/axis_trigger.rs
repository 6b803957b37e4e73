use ordered_float::OrderedFloat;

use crate::core::windowing::lower_bound;
use crate::core::{SeriesColumns, SeriesKind};
use crate::render::{RenderFrame, RenderSeries};

use super::bar_hit::{BarLayout, bar_interval_hit};
use super::hit::{HitValue, SeriesHit};

/// At most one element per visible Cartesian series at pixel column `pointer_x`.
///
/// Bars prefer the bar whose horizontal extent contains the pointer, then fall
/// back to the nearest x. With `tolerance_px`, series whose nearest element is
/// farther away contribute nothing.
#[must_use]
pub fn find_points_at_x(
    frame: &RenderFrame,
    pointer_x: f64,
    tolerance_px: Option<f64>,
) -> Vec<SeriesHit> {
    if !pointer_x.is_finite() || pointer_x < 0.0 || pointer_x > frame.grid_area.width {
        return Vec::new();
    }
    let tolerance = tolerance_px.filter(|value| value.is_finite() && *value >= 0.0);
    let bar_layout = BarLayout::compute(frame);

    let mut matches = Vec::new();
    for (position, series) in frame.series.iter().enumerate() {
        if !series.visible || !series.kind.is_cartesian() {
            continue;
        }
        if series.kind == SeriesKind::Bar {
            if let Some(hit) = bar_layout
                .as_ref()
                .and_then(|layout| bar_interval_hit(frame, layout, position, pointer_x))
            {
                matches.push(hit);
                continue;
            }
        }
        if let Some(hit) = nearest_by_x(frame, series, pointer_x) {
            let within = tolerance.is_none_or(|limit| hit.distance_px.is_some_and(|d| d <= limit));
            if within {
                matches.push(hit);
            }
        }
    }
    matches
}

fn x_column(data: &SeriesColumns) -> Option<(&[f64], bool)> {
    match data {
        SeriesColumns::Points(points) => Some((points.x(), points.has_non_finite_x())),
        SeriesColumns::Ohlc(candles) => {
            Some((candles.timestamps(), candles.has_non_finite_timestamp()))
        }
        SeriesColumns::Pie(_) => None,
    }
}

fn nearest_by_x(frame: &RenderFrame, series: &RenderSeries, pointer_x: f64) -> Option<SeriesHit> {
    let (xs, has_non_finite) = x_column(&series.data)?;
    let distance = |index: usize| {
        let x = xs[index];
        x.is_finite()
            .then(|| OrderedFloat((frame.x_scale.scale(x) - pointer_x).abs()))
    };

    let candidates: Vec<usize> = if has_non_finite || !frame.x_scale.is_increasing() {
        (0..xs.len()).collect()
    } else {
        let insertion = lower_bound(xs, frame.x_scale.invert(pointer_x));
        [insertion.checked_sub(1), Some(insertion)]
            .into_iter()
            .flatten()
            .filter(|index| *index < xs.len())
            .collect()
    };

    // min_by_key keeps the first minimum, so equal distances favor the lower index.
    let (best_distance, data_index) = candidates
        .into_iter()
        .filter_map(|index| distance(index).map(|d| (d, index)))
        .min_by_key(|(d, index)| (*d, *index))?;

    let (value, anchor) = match series.data.as_ref() {
        SeriesColumns::Points(points) => {
            let point = points.point(data_index)?;
            (
                HitValue::Point(point),
                (frame.x_scale.scale(point.x), frame.y_scale.scale(point.y)),
            )
        }
        SeriesColumns::Ohlc(candles) => {
            let record = candles.record(data_index)?;
            (
                HitValue::Candle(record),
                (
                    frame.x_scale.scale(record.timestamp),
                    frame.y_scale.scale(record.close),
                ),
            )
        }
        SeriesColumns::Pie(_) => return None,
    };
    Some(SeriesHit::new(series, data_index, value, anchor).with_distance(best_distance.0))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{DataPoint, GridArea, LinearScale, PointColumns, SeriesStyle};

    fn series(index: usize, kind: SeriesKind, points: &[DataPoint]) -> RenderSeries {
        RenderSeries {
            index,
            kind,
            name: None,
            visible: true,
            data: Arc::new(SeriesColumns::Points(PointColumns::from_points(points))),
            style: SeriesStyle::default(),
        }
    }

    fn frame(series: Vec<RenderSeries>) -> RenderFrame {
        RenderFrame {
            grid_area: GridArea::new(0.0, 0.0, 100.0, 100.0),
            x_scale: LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("x scale"),
            y_scale: LinearScale::new((0.0, 10.0), (100.0, 0.0)).expect("y scale"),
            x_base_domain: (0.0, 10.0),
            x_visible_domain: (0.0, 10.0),
            y_domain: (0.0, 10.0),
            series,
            intro_progress: 1.0,
        }
    }

    #[test]
    fn one_match_per_series_with_tolerance() {
        let near = series(0, SeriesKind::Line, &[DataPoint::new(2.0, 1.0), DataPoint::new(4.0, 2.0)]);
        let far = series(1, SeriesKind::Scatter, &[DataPoint::new(9.0, 1.0)]);
        let frame = frame(vec![near, far]);

        let all = find_points_at_x(&frame, 38.0, None);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].data_index, 1);

        let close = find_points_at_x(&frame, 38.0, Some(5.0));
        assert_eq!(close.len(), 1);
        assert_eq!(close[0].series_index, 0);
    }

    #[test]
    fn equidistant_neighbors_pick_lower_index() {
        let line = series(0, SeriesKind::Line, &[DataPoint::new(2.0, 1.0), DataPoint::new(4.0, 2.0)]);
        let frame = frame(vec![line]);
        let hits = find_points_at_x(&frame, 30.0, None);
        assert_eq!(hits[0].data_index, 0);
    }
}
