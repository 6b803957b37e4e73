use std::hint::black_box;
use std::sync::Arc;

use chart_coordinator::core::sampling::{sample_ohlc, sample_points};
use chart_coordinator::core::windowing::slice_points;
use chart_coordinator::core::{
    DataPoint, GridArea, LinearScale, OhlcColumns, OhlcRecord, PointColumns, SamplingStrategy,
    SeriesColumns, SeriesKind, SeriesStyle,
};
use chart_coordinator::interaction::{HitTestTuning, find_nearest_point};
use chart_coordinator::render::{RenderFrame, RenderSeries};
use criterion::{Criterion, criterion_group, criterion_main};

fn wave(len: usize) -> PointColumns {
    let points: Vec<DataPoint> = (0..len)
        .map(|i| {
            let x = i as f64;
            DataPoint::new(x, (x * 0.01).sin() * 100.0 + (x * 0.37).cos() * 5.0)
        })
        .collect();
    PointColumns::from_points(&points)
}

fn bench_lttb_1m(c: &mut Criterion) {
    let columns = wave(1_000_000);
    c.bench_function("lttb_1m_to_5k", |b| {
        b.iter(|| {
            let _ = sample_points(
                black_box(columns.view()),
                black_box(SamplingStrategy::Lttb),
                black_box(5_000),
            );
        })
    });
}

fn bench_bucket_max_1m(c: &mut Criterion) {
    let columns = wave(1_000_000);
    c.bench_function("bucket_max_1m_to_5k", |b| {
        b.iter(|| {
            let _ = sample_points(
                black_box(columns.view()),
                black_box(SamplingStrategy::Max),
                black_box(5_000),
            );
        })
    });
}

fn bench_ohlc_100k(c: &mut Criterion) {
    let records: Vec<OhlcRecord> = (0..100_000)
        .map(|i| {
            let t = i as f64;
            let base = 100.0 + t * 0.05;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            OhlcRecord::new(t, base, close, base.min(close) - 0.75, base.max(close) + 0.75)
        })
        .collect();
    let columns = OhlcColumns::from_records(&records);
    c.bench_function("ohlc_100k_to_2k", |b| {
        b.iter(|| {
            let _ = sample_ohlc(black_box(&columns), black_box(2_000));
        })
    });
}

fn bench_visible_slice_1m(c: &mut Criterion) {
    let columns = wave(1_000_000);
    c.bench_function("visible_slice_1m_10pct", |b| {
        b.iter(|| {
            let _ = slice_points(black_box(&columns), black_box(450_000.0), black_box(550_000.0));
        })
    });
}

fn bench_nearest_point_100k(c: &mut Criterion) {
    let columns = wave(100_000);
    let frame = RenderFrame {
        grid_area: GridArea::new(0.0, 0.0, 1920.0, 1080.0),
        x_scale: LinearScale::new((0.0, 99_999.0), (0.0, 1920.0)).expect("x scale"),
        y_scale: LinearScale::new((-110.0, 110.0), (1080.0, 0.0)).expect("y scale"),
        x_base_domain: (0.0, 99_999.0),
        x_visible_domain: (0.0, 99_999.0),
        y_domain: (-110.0, 110.0),
        series: vec![RenderSeries {
            index: 0,
            kind: SeriesKind::Line,
            name: None,
            visible: true,
            data: Arc::new(SeriesColumns::Points(columns)),
            style: SeriesStyle::default(),
        }],
        intro_progress: 1.0,
    };
    c.bench_function("nearest_point_100k", |b| {
        b.iter(|| {
            let _ = find_nearest_point(
                black_box(&frame),
                black_box(960.0),
                black_box(540.0),
                HitTestTuning::default(),
            );
        })
    });
}

criterion_group!(
    benches,
    bench_lttb_1m,
    bench_bucket_max_1m,
    bench_ohlc_100k,
    bench_visible_slice_1m,
    bench_nearest_point_100k
);
criterion_main!(benches);
