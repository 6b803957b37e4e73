use chart_coordinator::core::sampling::{sample_ohlc, sample_points};
use chart_coordinator::core::windowing::{slice_points, visible_index_range};
use chart_coordinator::core::{
    AppendBatch, DataPoint, OhlcColumns, OhlcRecord, PointColumns, RuntimeSeriesStore,
    SamplingStrategy, SeriesData, SeriesKind, ZoomState,
};
use proptest::prelude::*;

fn sorted_points(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<DataPoint>> {
    prop::collection::vec((0.01f64..10.0, -1_000.0f64..1_000.0), len).prop_map(|steps| {
        let mut x = 0.0;
        steps
            .into_iter()
            .map(|(step, y)| {
                x += step;
                DataPoint::new(x, y)
            })
            .collect()
    })
}

fn strategy() -> impl Strategy<Value = SamplingStrategy> {
    prop_oneof![
        Just(SamplingStrategy::Lttb),
        Just(SamplingStrategy::Average),
        Just(SamplingStrategy::Max),
        Just(SamplingStrategy::Min),
    ]
}

proptest! {
    #[test]
    fn bounds_stay_ordered_across_appends(
        seed in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..20),
        batches in prop::collection::vec(
            prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..10),
            0..6,
        )
    ) {
        let mut store = RuntimeSeriesStore::new();
        let seed: Vec<DataPoint> = seed.into_iter().map(|(x, y)| DataPoint::new(x, y)).collect();
        store.replace(0, SeriesKind::Scatter, &SeriesData::Points(seed));
        for batch in batches {
            let points = batch.into_iter().map(|(x, y)| DataPoint::new(x, y)).collect();
            store.append(0, &AppendBatch::Points(points));
            if let Some(bounds) = store.bounds(0) {
                prop_assert!(bounds.x_min < bounds.x_max);
                prop_assert!(bounds.y_min < bounds.y_max);
            }
        }
    }

    #[test]
    fn grouped_and_single_appends_agree(
        seed in sorted_points(1..10),
        a in sorted_points(0..5),
        b in sorted_points(0..5),
        c in sorted_points(0..5)
    ) {
        let mut grouped = RuntimeSeriesStore::new();
        let mut single = RuntimeSeriesStore::new();
        grouped.replace(0, SeriesKind::Line, &SeriesData::Points(seed.clone()));
        single.replace(0, SeriesKind::Line, &SeriesData::Points(seed));

        let ab: Vec<DataPoint> = a.iter().chain(b.iter()).copied().collect();
        grouped.append(0, &AppendBatch::Points(ab));
        grouped.append(0, &AppendBatch::Points(c.clone()));
        for batch in [a, b, c] {
            single.append(0, &AppendBatch::Points(batch));
        }

        prop_assert_eq!(grouped.columns(0), single.columns(0));
        prop_assert_eq!(grouped.bounds(0), single.bounds(0));
    }

    #[test]
    fn sampling_keeps_endpoints(
        points in sorted_points(2..400),
        target in 2usize..120,
        strategy in strategy()
    ) {
        let columns = PointColumns::from_points(&points);
        let sampled = sample_points(columns.view(), strategy, target);
        prop_assert!(sampled.len() <= points.len().max(target));
        prop_assert_eq!(sampled.x()[0], points[0].x);
        prop_assert_eq!(sampled.x()[sampled.len() - 1], points[points.len() - 1].x);
    }

    #[test]
    fn sampled_x_stays_sorted(
        points in sorted_points(2..400),
        target in 2usize..120,
        strategy in strategy()
    ) {
        let columns = PointColumns::from_points(&points);
        let sampled = sample_points(columns.view(), strategy, target);
        prop_assert!(sampled.x().windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn ohlc_sampling_keeps_edge_records(
        closes in prop::collection::vec(1.0f64..100.0, 2..200),
        target in 2usize..50
    ) {
        let records: Vec<OhlcRecord> = closes
            .iter()
            .enumerate()
            .map(|(i, close)| OhlcRecord::new(i as f64, *close, *close, close - 1.0, close + 1.0))
            .collect();
        let columns = OhlcColumns::from_records(&records);
        let sampled = sample_ohlc(&columns, target);
        prop_assert_eq!(sampled.record(0), Some(records[0]));
        prop_assert_eq!(sampled.record(sampled.len() - 1), records.last().copied());
        let low = closes.iter().copied().fold(f64::INFINITY, f64::min) - 1.0;
        let sampled_low = sampled.iter().map(|r| r.low).fold(f64::INFINITY, f64::min);
        prop_assert_eq!(sampled_low, low);
    }

    #[test]
    fn slicing_is_idempotent(
        points in sorted_points(0..200),
        a in -10.0f64..2_000.0,
        b in -10.0f64..2_000.0
    ) {
        let columns = PointColumns::from_points(&points);
        let once = slice_points(&columns, a, b);
        let twice = slice_points(&once, a, b);
        prop_assert_eq!(&once, &twice);
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(once.x().iter().all(|x| (min..=max).contains(x)));
    }

    #[test]
    fn visible_range_matches_linear_filter(
        points in sorted_points(0..200),
        min in -10.0f64..2_000.0,
        width in 0.0f64..500.0
    ) {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let range = visible_index_range(&xs, min, min + width);
        let expected = xs.iter().filter(|x| **x >= min && **x <= min + width).count();
        prop_assert_eq!(range.len(), expected);
    }

    #[test]
    fn zoom_window_always_valid(
        min_span in 0.0f64..100.0,
        start in -500.0f64..500.0,
        end in -500.0f64..500.0
    ) {
        let mut zoom = ZoomState::default();
        zoom.set_span_constraints(min_span, 100.0, None);
        zoom.set_range(start, end, None);
        let range = zoom.range();
        prop_assert!(0.0 <= range.start);
        prop_assert!(range.start <= range.end);
        prop_assert!(range.end <= 100.0);
        prop_assert!(range.span() >= min_span - 1e-9);
    }

    #[test]
    fn pan_never_changes_span_away_from_edges(
        start in 10.0f64..40.0,
        span in 5.0f64..40.0,
        delta in -9.0f64..9.0
    ) {
        let mut zoom = ZoomState::default();
        zoom.set_range(start, start + span, None);
        let before = zoom.range().span();
        zoom.pan(delta, None);
        prop_assert!((zoom.range().span() - before).abs() < 1e-9);
    }
}
