use std::sync::Arc;

use chart_coordinator::animation::AnimationConfig;
use chart_coordinator::api::{ChartCoordinator, ResolvedOptions};
use chart_coordinator::core::{
    AppendBatch, DataPoint, FlushPhase, GridArea, PieSlice, ResolvedSeriesConfig,
    SamplingStrategy, SeriesData, SeriesKind,
};
use chart_coordinator::host::{FrameHandle, FrameHost, ManualFrameHost, TimerHandle};
use chart_coordinator::render::NullRenderer;

type Coordinator = ChartCoordinator<NullRenderer, ManualFrameHost>;

fn line_options(points: Vec<DataPoint>) -> ResolvedOptions {
    ResolvedOptions::new(GridArea::new(0.0, 0.0, 400.0, 300.0))
        .with_series(ResolvedSeriesConfig::new(
            SeriesKind::Line,
            SeriesData::Points(points),
        ))
        .with_animation(AnimationConfig::disabled())
}

fn coordinator(options: ResolvedOptions) -> Coordinator {
    ChartCoordinator::new(NullRenderer::default(), ManualFrameHost::new(), options)
        .expect("coordinator init")
}

fn seed() -> Vec<DataPoint> {
    vec![DataPoint::new(0.0, 1.0), DataPoint::new(1.0, 2.0)]
}

fn point_batch(x: f64) -> AppendBatch {
    AppendBatch::Points(vec![DataPoint::new(x, x * 2.0)])
}

fn pump_frames(coordinator: &mut Coordinator) {
    for frame in coordinator.host_mut().take_frames() {
        coordinator.on_frame(frame);
    }
}

fn fire_due_timers(coordinator: &mut Coordinator) {
    for timer in coordinator.host_mut().take_due_timers() {
        coordinator.on_timer(timer);
    }
}

#[test]
fn repeated_appends_share_one_flush() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, point_batch(2.0));
    coordinator.append_data(0, point_batch(3.0));
    coordinator.append_data(0, point_batch(4.0));

    assert_eq!(coordinator.host().pending_frames().len(), 1);
    assert_eq!(coordinator.host().pending_timers().len(), 1);
    assert_eq!(coordinator.pending_append_batches(), 3);
    assert_eq!(coordinator.raw_len(0), 2);

    pump_frames(&mut coordinator);

    assert_eq!(coordinator.raw_len(0), 5);
    assert_eq!(coordinator.pending_append_batches(), 0);
    assert!(coordinator.host().pending_timers().is_empty());
    assert_eq!(coordinator.host().cancelled_counts(), (0, 1));
    assert_eq!(coordinator.snapshot().scheduler.phase, FlushPhase::Idle);
}

#[test]
fn fallback_timer_flushes_when_no_frame_arrives() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, point_batch(2.0));

    coordinator.host_mut().advance(15.0);
    fire_due_timers(&mut coordinator);
    assert_eq!(coordinator.raw_len(0), 2);

    coordinator.host_mut().advance(1.0);
    fire_due_timers(&mut coordinator);
    assert_eq!(coordinator.raw_len(0), 3);
    assert!(coordinator.host().pending_frames().is_empty());
    assert_eq!(coordinator.host().cancelled_counts(), (1, 0));
}

#[test]
fn appends_apply_in_call_order_across_batch_shapes() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, point_batch(2.0));
    coordinator.append_data(
        0,
        AppendBatch::Columnar {
            x: vec![3.0, 4.0],
            y: vec![6.0, 8.0],
            size: None,
        },
    );
    coordinator.append_data(0, point_batch(5.0));
    pump_frames(&mut coordinator);

    coordinator.render().expect("render");
    let frame = coordinator.last_frame().expect("frame");
    let points = frame.series[0].data.as_points().expect("point series");
    assert_eq!(points.x(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(points.y(), &[1.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
}

#[test]
fn stale_handles_are_ignored() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, point_batch(2.0));
    coordinator.on_frame(FrameHandle(9_999));
    coordinator.on_timer(TimerHandle(9_999));
    assert_eq!(coordinator.raw_len(0), 2);
    assert_eq!(coordinator.pending_append_batches(), 1);
}

#[test]
fn empty_and_unknown_appends_do_not_schedule() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, AppendBatch::Points(Vec::new()));
    coordinator.append_data(7, point_batch(2.0));
    assert!(coordinator.host().pending_frames().is_empty());
    assert!(coordinator.host().pending_timers().is_empty());
}

#[test]
fn append_to_pie_series_is_a_no_op() {
    let options = ResolvedOptions::new(GridArea::new(0.0, 0.0, 200.0, 200.0))
        .with_series(ResolvedSeriesConfig::new(
            SeriesKind::Pie,
            SeriesData::Pie(vec![PieSlice::new("a", 1.0), PieSlice::new("b", 2.0)]),
        ))
        .with_animation(AnimationConfig::disabled());
    let mut coordinator = coordinator(options);
    let revision = coordinator.snapshot().series[0].revision;

    coordinator.append_data(0, point_batch(1.0));
    pump_frames(&mut coordinator);

    let snapshot = coordinator.snapshot();
    assert_eq!(snapshot.series[0].revision, revision);
    assert_eq!(snapshot.series[0].raw_count, 2);
}

#[test]
fn set_options_flushes_pending_appends_first() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, point_batch(2.0));

    // Same data as before: streamed points must survive the option change.
    coordinator.set_options(line_options(seed()));
    assert_eq!(coordinator.raw_len(0), 3);
    assert_eq!(coordinator.pending_append_batches(), 0);

    coordinator.set_options(line_options(vec![DataPoint::new(10.0, 1.0)]));
    assert_eq!(coordinator.raw_len(0), 1);
}

#[test]
fn bounds_extend_with_appends() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.append_data(0, AppendBatch::Points(vec![DataPoint::new(9.0, -4.0)]));
    coordinator.flush_now();

    let bounds = coordinator.series_bounds(0).expect("bounds");
    assert_eq!(bounds.x_domain(), (0.0, 9.0));
    assert_eq!(bounds.y_domain(), (-4.0, 2.0));
}

#[test]
fn dispose_cancels_host_work_and_turns_calls_into_no_ops() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.render().expect("render");
    coordinator.append_data(0, point_batch(2.0));
    coordinator.dispose();

    assert!(coordinator.is_disposed());
    assert!(coordinator.host().pending_frames().is_empty());
    assert!(coordinator.host().pending_timers().is_empty());

    coordinator.append_data(0, point_batch(3.0));
    assert!(coordinator.host().pending_frames().is_empty());
    assert_eq!(coordinator.raw_len(0), 0);
    assert!(coordinator.zoom_range().is_none());
    assert!(!coordinator.set_interaction_x(Some(1.0), None));
    assert!(coordinator.on_interaction_x_change(|_| {}).is_none());
    assert!(coordinator.hit_test(10.0, 10.0).is_none());
    assert!(coordinator.last_frame().is_none());

    let rendered = coordinator.renderer().frames_rendered;
    coordinator.render().expect("disposed render is a no-op");
    assert_eq!(coordinator.renderer().frames_rendered, rendered);
    assert!(coordinator.snapshot().disposed);
}

#[test]
fn host_clock_drives_flush_latency() {
    let mut host = ManualFrameHost::starting_at(1_000.0);
    host.advance(5.0);
    assert_eq!(host.now_ms(), 1_005.0);
    let mut coordinator =
        ChartCoordinator::new(NullRenderer::default(), host, line_options(seed()))
            .expect("coordinator init");
    coordinator.append_data(0, point_batch(2.0));
    let (_, due) = coordinator.host().pending_timers()[0];
    assert_eq!(due, 1_021.0);
}

#[test]
fn streaming_into_sampled_series_is_flagged_once() {
    let options = ResolvedOptions::new(GridArea::new(0.0, 0.0, 400.0, 300.0))
        .with_series(
            ResolvedSeriesConfig::new(SeriesKind::Line, SeriesData::Points(seed()))
                .with_sampling(SamplingStrategy::Lttb, 100),
        )
        .with_series(ResolvedSeriesConfig::new(
            SeriesKind::Scatter,
            SeriesData::Points(seed()),
        ))
        .with_animation(AnimationConfig::disabled());
    let mut coordinator = coordinator(options);

    coordinator.append_data(0, point_batch(2.0));
    coordinator.append_data(1, point_batch(2.0));
    let flags: Vec<bool> = coordinator
        .snapshot()
        .series
        .iter()
        .map(|series| series.streaming_sampling_warned)
        .collect();
    assert_eq!(flags, vec![true, false]);

    coordinator.append_data(0, point_batch(3.0));
    coordinator.flush_now();
    assert!(coordinator.snapshot().series[0].streaming_sampling_warned);
    assert_eq!(coordinator.raw_len(0), 4);
}

#[test]
fn unsampled_full_span_frames_share_raw_columns() {
    let mut coordinator = coordinator(line_options(seed()));
    coordinator.render().expect("render");
    {
        let raw = coordinator.raw_columns(0).expect("raw columns");
        let frame = coordinator.last_frame().expect("frame");
        assert!(Arc::ptr_eq(&raw, &frame.series[0].data));
    }

    coordinator.append_data(0, point_batch(2.0));
    coordinator.flush_now();
    coordinator.render().expect("render");
    let raw = coordinator.raw_columns(0).expect("raw columns");
    let frame = coordinator.last_frame().expect("frame");
    assert!(Arc::ptr_eq(&raw, &frame.series[0].data));
    assert_eq!(raw.len(), 3);
}
