use std::sync::Arc;

use approx::assert_relative_eq;
use chart_coordinator::animation::AnimationConfig;
use chart_coordinator::api::{ChartCoordinator, ResolvedOptions};
use chart_coordinator::core::{
    DataPoint, Dimension, GridArea, LinearScale, OhlcRecord, PieSlice, PointColumns,
    ResolvedSeriesConfig, SeriesColumns, SeriesData, SeriesKind, SeriesStyle,
};
use chart_coordinator::host::ManualFrameHost;
use chart_coordinator::interaction::{
    HitTestTuning, HitValue, find_bar_at, find_nearest_point, find_points_at_x,
};
use chart_coordinator::render::{NullRenderer, RenderFrame, RenderSeries};

fn point_series(index: usize, kind: SeriesKind, points: &[DataPoint]) -> RenderSeries {
    RenderSeries {
        index,
        kind,
        name: Some(format!("s{index}")),
        visible: true,
        data: Arc::new(SeriesColumns::Points(PointColumns::from_points(points))),
        style: SeriesStyle::default(),
    }
}

fn identity_frame(series: Vec<RenderSeries>) -> RenderFrame {
    RenderFrame {
        grid_area: GridArea::new(0.0, 0.0, 20.0, 20.0),
        x_scale: LinearScale::new((0.0, 20.0), (0.0, 20.0)).expect("x scale"),
        y_scale: LinearScale::new((0.0, 20.0), (0.0, 20.0)).expect("y scale"),
        x_base_domain: (0.0, 20.0),
        x_visible_domain: (0.0, 20.0),
        y_domain: (0.0, 20.0),
        series,
        intro_progress: 1.0,
    }
}

#[test]
fn nearest_point_resolves_closest_and_breaks_ties_low() {
    let points = [
        DataPoint::new(0.0, 0.0),
        DataPoint::new(10.0, 10.0),
        DataPoint::new(20.0, 0.0),
    ];
    let frame = identity_frame(vec![point_series(0, SeriesKind::Line, &points)]);

    let hit = find_nearest_point(&frame, 9.0, 9.0, HitTestTuning::default()).expect("hit");
    assert_eq!(hit.data_index, 1);
    assert_relative_eq!(hit.distance_px.expect("distance"), 2f64.sqrt(), epsilon = 1e-12);
    assert_eq!(hit.value, HitValue::Point(DataPoint::new(10.0, 10.0)));

    let tie = find_nearest_point(&frame, 5.0, 5.0, HitTestTuning::default()).expect("hit");
    assert_eq!(tie.data_index, 0);
}

#[test]
fn nearest_point_respects_the_distance_cutoff() {
    let points = [DataPoint::new(10.0, 10.0)];
    let frame = identity_frame(vec![point_series(0, SeriesKind::Line, &points)]);
    let tuning = HitTestTuning {
        max_distance_px: 3.0,
        ..HitTestTuning::default()
    };
    assert!(find_nearest_point(&frame, 12.0, 10.0, tuning).is_some());
    assert!(find_nearest_point(&frame, 15.0, 10.0, tuning).is_none());
}

#[test]
fn hidden_series_are_not_hit() {
    let mut hidden = point_series(0, SeriesKind::Line, &[DataPoint::new(10.0, 10.0)]);
    hidden.visible = false;
    let frame = identity_frame(vec![hidden]);
    assert!(find_nearest_point(&frame, 10.0, 10.0, HitTestTuning::default()).is_none());
}

fn bar_frame(series: Vec<RenderSeries>) -> RenderFrame {
    RenderFrame {
        grid_area: GridArea::new(0.0, 0.0, 100.0, 100.0),
        x_scale: LinearScale::new((-5.0, 5.0), (0.0, 100.0)).expect("x scale"),
        y_scale: LinearScale::new((0.0, 10.0), (100.0, 0.0)).expect("y scale"),
        x_base_domain: (-5.0, 5.0),
        x_visible_domain: (-5.0, 5.0),
        y_domain: (0.0, 10.0),
        series,
        intro_progress: 1.0,
    }
}

fn fixed_width_bar(index: usize, value: f64) -> RenderSeries {
    let mut series = point_series(index, SeriesKind::Bar, &[DataPoint::new(0.0, value)]);
    series.style.bar.bar_width = Some(Dimension::Px(10.0));
    series.style.bar.bar_gap = 0.1;
    series
}

#[test]
fn adjacent_unstacked_bars_never_cross_match() {
    let frame = bar_frame(vec![fixed_width_bar(0, 5.0), fixed_width_bar(1, 5.0)]);

    // Cluster: [39.5, 49.5] for series 0, 1 px gap, [50.5, 60.5] for series 1.
    let right = find_bar_at(&frame, 50.6, 75.0).expect("series 1");
    assert_eq!(right.series_index, 1);
    let right = find_bar_at(&frame, 60.4, 99.0).expect("series 1");
    assert_eq!(right.series_index, 1);

    let left = find_bar_at(&frame, 49.4, 75.0).expect("series 0");
    assert_eq!(left.series_index, 0);
    let left = find_bar_at(&frame, 39.6, 51.0).expect("series 0");
    assert_eq!(left.series_index, 0);

    assert!(find_bar_at(&frame, 50.0, 75.0).is_none());
    assert!(find_bar_at(&frame, 55.0, 40.0).is_none());
}

#[test]
fn axis_trigger_returns_one_match_per_series() {
    let line = point_series(
        0,
        SeriesKind::Line,
        &[DataPoint::new(0.0, 1.0), DataPoint::new(4.0, 2.0), DataPoint::new(8.0, 3.0)],
    );
    let scatter = point_series(1, SeriesKind::Scatter, &[DataPoint::new(5.0, 7.0)]);
    let frame = identity_frame(vec![line, scatter]);

    let hits = find_points_at_x(&frame, 4.5, None);
    assert_eq!(hits.len(), 2);
    assert_eq!((hits[0].series_index, hits[0].data_index), (0, 1));
    assert_eq!((hits[1].series_index, hits[1].data_index), (1, 0));

    let near_only = find_points_at_x(&frame, 4.5, Some(0.6));
    assert_eq!(near_only.len(), 2);
    let strict = find_points_at_x(&frame, 4.5, Some(0.4));
    assert!(strict.is_empty());
}

fn rendered(options: ResolvedOptions) -> ChartCoordinator<NullRenderer, ManualFrameHost> {
    let mut coordinator =
        ChartCoordinator::new(NullRenderer::default(), ManualFrameHost::new(), options)
            .expect("coordinator init");
    coordinator.render().expect("render");
    coordinator
}

#[test]
fn pie_slices_resolve_clockwise_from_twelve_o_clock() {
    let options = ResolvedOptions::new(GridArea::new(0.0, 0.0, 200.0, 200.0))
        .with_series(ResolvedSeriesConfig::new(
            SeriesKind::Pie,
            SeriesData::Pie(vec![
                PieSlice::new("a", 1.0),
                PieSlice::new("b", 1.0),
                PieSlice::new("c", 2.0),
            ]),
        ))
        .with_animation(AnimationConfig::disabled());
    let coordinator = rendered(options);

    let upper_right = coordinator.hit_test_pie(130.0, 70.0).expect("slice a");
    assert_eq!(upper_right.data_index, 0);
    match upper_right.value {
        HitValue::Slice { slice, fraction } => {
            assert_eq!(slice.name, "a");
            assert_relative_eq!(fraction, 0.25);
        }
        other => panic!("unexpected hit value {other:?}"),
    }
    assert_eq!(coordinator.hit_test_pie(130.0, 130.0).expect("slice b").data_index, 1);
    assert_eq!(coordinator.hit_test_pie(70.0, 100.0).expect("slice c").data_index, 2);
    assert!(coordinator.hit_test_pie(190.0, 100.0).is_none());
}

#[test]
fn candle_bodies_are_targets_and_gaps_are_not() {
    let candles: Vec<OhlcRecord> = (0..10)
        .map(|i| OhlcRecord::new(i as f64, 10.0, 20.0, 5.0, 25.0))
        .collect();
    let options = ResolvedOptions::new(GridArea::new(0.0, 0.0, 90.0, 100.0))
        .with_series(ResolvedSeriesConfig::new(
            SeriesKind::Candlestick,
            SeriesData::Ohlc(candles),
        ))
        .with_animation(AnimationConfig::disabled());
    let coordinator = rendered(options);

    // Ten candles over 90 px: 10 px per category, 8 px bodies, body spans y 25..75.
    let hit = coordinator.hit_test_candlestick(30.0, 50.0).expect("candle 3");
    assert_eq!(hit.data_index, 3);
    assert!(matches!(hit.value, HitValue::Candle(record) if record.timestamp == 3.0));

    assert!(coordinator.hit_test_candlestick(35.0, 50.0).is_none());
    assert!(coordinator.hit_test_candlestick(30.0, 10.0).is_none());
    assert_eq!(
        coordinator.hit_test(30.0, 50.0).map(|hit| hit.kind),
        Some(SeriesKind::Candlestick)
    );
}

#[test]
fn hit_tests_miss_before_the_first_render() {
    let options = ResolvedOptions::new(GridArea::new(0.0, 0.0, 20.0, 20.0)).with_series(
        ResolvedSeriesConfig::new(
            SeriesKind::Scatter,
            SeriesData::Points(vec![DataPoint::new(1.0, 1.0)]),
        ),
    );
    let coordinator =
        ChartCoordinator::new(NullRenderer::default(), ManualFrameHost::new(), options)
            .expect("coordinator init");
    assert!(coordinator.hit_test(10.0, 10.0).is_none());
    assert!(coordinator.points_at_x(10.0, None).is_empty());
}
