use ordered_float::OrderedFloat;

use crate::core::windowing::lower_bound;
use crate::core::{PointColumns, SeriesKind};
use crate::render::{RenderFrame, RenderSeries};

use super::hit::{HitTestTuning, HitValue, SeriesHit};

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance_sq: OrderedFloat<f64>,
    series_position: usize,
    data_index: usize,
}

/// Nearest line/area/scatter point to the pointer, in grid-local pixels.
///
/// Ties on distance go to the lowest series index, then the lowest data index.
#[must_use]
pub fn find_nearest_point(
    frame: &RenderFrame,
    pointer_x: f64,
    pointer_y: f64,
    tuning: HitTestTuning,
) -> Option<SeriesHit> {
    if !frame.grid_area.contains_local(pointer_x, pointer_y) {
        return None;
    }

    let mut best: Option<Candidate> = None;
    for (position, series) in frame.series.iter().enumerate() {
        if !series.visible
            || !matches!(series.kind, SeriesKind::Line | SeriesKind::Area | SeriesKind::Scatter)
        {
            continue;
        }
        let Some(columns) = series.data.as_points() else {
            continue;
        };
        let bound = best.map(|candidate| candidate.distance_sq);
        if let Some((distance_sq, data_index)) =
            nearest_in_series(frame, series, columns, pointer_x, pointer_y, tuning, bound)
        {
            // Later series only win on a strictly smaller distance.
            if best.is_none_or(|current| distance_sq < current.distance_sq) {
                best = Some(Candidate {
                    distance_sq,
                    series_position: position,
                    data_index,
                });
            }
        }
    }

    let best = best?;
    let series = &frame.series[best.series_position];
    let point = series.data.as_points()?.point(best.data_index)?;
    let anchor = (frame.x_scale.scale(point.x), frame.y_scale.scale(point.y));
    Some(
        SeriesHit::new(series, best.data_index, HitValue::Point(point), anchor)
            .with_distance(best.distance_sq.0.sqrt()),
    )
}

fn symbol_radius(series: &RenderSeries, tuning: HitTestTuning, size: Option<f64>) -> f64 {
    size.filter(|size| size.is_finite() && *size >= 0.0)
        .or(series.style.symbol_size)
        .unwrap_or(tuning.default_symbol_radius_px)
}

/// Largest pointer distance that can still hit any point of the series.
fn series_cutoff(series: &RenderSeries, columns: &PointColumns, tuning: HitTestTuning) -> f64 {
    if series.kind != SeriesKind::Scatter {
        return tuning.max_distance_px;
    }
    let largest_radius = match columns.sizes() {
        Some(sizes) => sizes
            .iter()
            .map(|size| symbol_radius(series, tuning, *size))
            .fold(0.0_f64, f64::max),
        None => symbol_radius(series, tuning, None),
    };
    tuning.max_distance_px.max(largest_radius)
}

fn point_cutoff(
    series: &RenderSeries,
    columns: &PointColumns,
    tuning: HitTestTuning,
    index: usize,
) -> f64 {
    if series.kind != SeriesKind::Scatter {
        return tuning.max_distance_px;
    }
    let size = columns.sizes().and_then(|sizes| sizes[index]);
    tuning.max_distance_px.max(symbol_radius(series, tuning, size))
}

fn nearest_in_series(
    frame: &RenderFrame,
    series: &RenderSeries,
    columns: &PointColumns,
    pointer_x: f64,
    pointer_y: f64,
    tuning: HitTestTuning,
    global_best: Option<OrderedFloat<f64>>,
) -> Option<(OrderedFloat<f64>, usize)> {
    let xs = columns.x();
    let ys = columns.y();
    let cutoff = series_cutoff(series, columns, tuning);
    let cutoff_sq = cutoff * cutoff;
    let mut best: Option<(OrderedFloat<f64>, usize)> = None;

    let consider = |index: usize, best: &mut Option<(OrderedFloat<f64>, usize)>| {
        let (x, y) = (xs[index], ys[index]);
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let dx = frame.x_scale.scale(x) - pointer_x;
        let dy = frame.y_scale.scale(y) - pointer_y;
        let distance_sq = dx * dx + dy * dy;
        let limit = point_cutoff(series, columns, tuning, index);
        if distance_sq > limit * limit {
            return;
        }
        let distance_sq = OrderedFloat(distance_sq);
        let better = match *best {
            None => true,
            Some((current, current_index)) => {
                distance_sq < current || (distance_sq == current && index < current_index)
            }
        };
        if better {
            *best = Some((distance_sq, index));
        }
    };

    if columns.has_non_finite_x() || !frame.x_scale.is_increasing() {
        for index in 0..xs.len() {
            consider(index, &mut best);
        }
        return best;
    }

    let pruning_bound = |best: &Option<(OrderedFloat<f64>, usize)>| {
        let local = best.map_or(cutoff_sq, |(distance, _)| distance.0.min(cutoff_sq));
        global_best.map_or(local, |global| local.min(global.0))
    };

    let insertion = lower_bound(xs, frame.x_scale.invert(pointer_x));
    let mut left = insertion;
    while left > 0 {
        left -= 1;
        let dx = frame.x_scale.scale(xs[left]) - pointer_x;
        if dx * dx > pruning_bound(&best) {
            break;
        }
        consider(left, &mut best);
    }
    for right in insertion..xs.len() {
        let dx = frame.x_scale.scale(xs[right]) - pointer_x;
        if dx * dx > pruning_bound(&best) {
            break;
        }
        consider(right, &mut best);
    }

    best
}
