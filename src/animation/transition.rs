use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animation::Easing;
use crate::core::primitives::lerp;
use crate::core::{PieSlice, PointColumns, SeriesColumns};
use crate::render::RenderSeries;

fn default_intro_duration_ms() -> f64 {
    600.0
}

fn default_update_duration_ms() -> f64 {
    300.0
}

/// Delay, duration and easing of one progress track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackTiming {
    #[serde(default)]
    pub delay_ms: f64,
    pub duration_ms: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl TrackTiming {
    #[must_use]
    pub fn new(delay_ms: f64, duration_ms: f64, easing: Easing) -> Self {
        Self {
            delay_ms,
            duration_ms,
            easing,
        }
    }
}

fn default_intro_timing() -> TrackTiming {
    TrackTiming::new(0.0, default_intro_duration_ms(), Easing::CubicOut)
}

fn default_update_timing() -> TrackTiming {
    TrackTiming::new(0.0, default_update_duration_ms(), Easing::CubicOut)
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_intro_timing")]
    pub intro: TrackTiming,
    #[serde(default = "default_update_timing")]
    pub update: TrackTiming,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            intro: default_intro_timing(),
            update: default_update_timing(),
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackPhase {
    Pending,
    Running,
    Done,
}

/// Time-driven `pending -> running -> done` progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTrack {
    timing: TrackTiming,
    started_at_ms: Option<f64>,
}

impl ProgressTrack {
    #[must_use]
    pub fn idle(timing: TrackTiming) -> Self {
        Self {
            timing,
            started_at_ms: None,
        }
    }

    #[must_use]
    pub fn started(timing: TrackTiming, now_ms: f64) -> Self {
        Self {
            timing,
            started_at_ms: Some(now_ms),
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started_at_ms.is_some()
    }

    #[must_use]
    pub fn phase(&self, now_ms: f64) -> TrackPhase {
        let Some(started) = self.started_at_ms else {
            return TrackPhase::Pending;
        };
        let elapsed = now_ms - started - self.timing.delay_ms.max(0.0);
        if elapsed < 0.0 {
            TrackPhase::Pending
        } else if self.timing.duration_ms.is_nan()
            || self.timing.duration_ms <= 0.0
            || elapsed >= self.timing.duration_ms
        {
            TrackPhase::Done
        } else {
            TrackPhase::Running
        }
    }

    /// Un-eased fraction in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self, now_ms: f64) -> f64 {
        match self.phase(now_ms) {
            TrackPhase::Pending => 0.0,
            TrackPhase::Done => 1.0,
            TrackPhase::Running => {
                let started = self.started_at_ms.unwrap_or(now_ms);
                let elapsed = now_ms - started - self.timing.delay_ms.max(0.0);
                (elapsed / self.timing.duration_ms).clamp(0.0, 1.0)
            }
        }
    }

    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        self.timing.easing.apply(self.fraction(now_ms))
    }
}

/// Immutable capture of the chart at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionSnapshot {
    pub x_base_domain: (f64, f64),
    pub x_visible_domain: (f64, f64),
    pub y_base_domain: (f64, f64),
    pub series: Vec<RenderSeries>,
}

/// Blends `from` towards `to` at eased progress `t`.
///
/// Point series interpolate x and y per index, pie series interpolate slice
/// values; anything with a changed kind, a length mismatch, or more than
/// `interpolation_cap` elements snaps to `to`.
#[must_use]
pub fn interpolate_snapshot(
    from: &TransitionSnapshot,
    to: &TransitionSnapshot,
    t: f64,
    interpolation_cap: usize,
) -> TransitionSnapshot {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    TransitionSnapshot {
        x_base_domain: lerp_domain(from.x_base_domain, to.x_base_domain, t),
        x_visible_domain: lerp_domain(from.x_visible_domain, to.x_visible_domain, t),
        y_base_domain: lerp_domain(from.y_base_domain, to.y_base_domain, t),
        series: to
            .series
            .iter()
            .map(|target| {
                match from.series.iter().find(|source| source.index == target.index) {
                    Some(source) => interpolate_series(source, target, t, interpolation_cap),
                    None => target.clone(),
                }
            })
            .collect(),
    }
}

fn lerp_domain(a: (f64, f64), b: (f64, f64), t: f64) -> (f64, f64) {
    (lerp(a.0, b.0, t), lerp(a.1, b.1, t))
}

fn interpolate_series(
    from: &RenderSeries,
    to: &RenderSeries,
    t: f64,
    interpolation_cap: usize,
) -> RenderSeries {
    if t >= 1.0 || from.kind != to.kind || Arc::ptr_eq(&from.data, &to.data) {
        return to.clone();
    }
    let len = to.data.len();
    if from.data.len() != len || len > interpolation_cap {
        return to.clone();
    }

    let blended = match (from.data.as_ref(), to.data.as_ref()) {
        (SeriesColumns::Points(a), SeriesColumns::Points(b)) => {
            let mut columns = PointColumns::with_capacity(len);
            for index in 0..len {
                let size = b.sizes().and_then(|sizes| sizes[index]);
                columns.push_parts(
                    lerp(a.x()[index], b.x()[index], t),
                    lerp(a.y()[index], b.y()[index], t),
                    size,
                );
            }
            SeriesColumns::Points(columns)
        }
        (SeriesColumns::Pie(a), SeriesColumns::Pie(b)) => SeriesColumns::Pie(
            a.iter()
                .zip(b)
                .map(|(from_slice, to_slice)| {
                    PieSlice::new(
                        to_slice.name.clone(),
                        lerp(from_slice.value, to_slice.value, t),
                    )
                })
                .collect(),
        ),
        _ => return to.clone(),
    };

    RenderSeries {
        data: Arc::new(blended),
        ..to.clone()
    }
}

#[derive(Debug, Clone)]
struct UpdateTransition {
    from: TransitionSnapshot,
    to: TransitionSnapshot,
    track: ProgressTrack,
}

/// Serializable view of both tracks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionStatus {
    pub intro: TrackPhase,
    pub intro_progress: f64,
    pub update: Option<TrackPhase>,
    pub update_progress: Option<f64>,
}

/// Intro and update animation tracks.
#[derive(Debug, Clone)]
pub struct TransitionController {
    config: AnimationConfig,
    interpolation_cap: usize,
    intro: ProgressTrack,
    update: Option<UpdateTransition>,
}

impl TransitionController {
    #[must_use]
    pub fn new(config: AnimationConfig, interpolation_cap: usize) -> Self {
        Self {
            config,
            interpolation_cap,
            intro: ProgressTrack::idle(config.intro),
            update: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> AnimationConfig {
        self.config
    }

    /// Applies new timing. Disabling animation cancels the running update.
    pub fn set_config(&mut self, config: AnimationConfig) {
        self.config = config;
        if !config.enabled {
            self.update = None;
        }
        if !self.intro.is_started() {
            self.intro = ProgressTrack::idle(config.intro);
        }
    }

    /// Starts the intro once there is something to grow. Returns `true` when started.
    pub fn maybe_start_intro(&mut self, now_ms: f64, has_drawable_mark: bool) -> bool {
        if !self.config.enabled || self.intro.is_started() || !has_drawable_mark {
            return false;
        }
        self.intro = ProgressTrack::started(self.config.intro, now_ms);
        trace!(now_ms, "intro transition started");
        true
    }

    /// Eased intro progress; 1 when animation is disabled.
    #[must_use]
    pub fn intro_progress(&self, now_ms: f64) -> f64 {
        if !self.config.enabled {
            return 1.0;
        }
        self.intro.progress(now_ms)
    }

    #[must_use]
    pub fn intro_phase(&self, now_ms: f64) -> TrackPhase {
        if !self.config.enabled {
            return TrackPhase::Done;
        }
        self.intro.phase(now_ms)
    }

    /// Starts an update transition; no-op when animation is disabled.
    pub fn begin_update(&mut self, from: TransitionSnapshot, to: TransitionSnapshot, now_ms: f64) {
        if !self.config.enabled {
            self.update = None;
            return;
        }
        trace!(now_ms, series = to.series.len(), "update transition started");
        self.update = Some(UpdateTransition {
            from,
            to,
            track: ProgressTrack::started(self.config.update, now_ms),
        });
    }

    /// Re-aims a running update at `to`, starting from the blended state at
    /// `now_ms`. The x domains switch to the target at once so navigation is
    /// never eased. Returns `false` when no update is in flight.
    pub fn rebase_update(&mut self, to: TransitionSnapshot, now_ms: f64) -> bool {
        self.retire_finished(now_ms);
        let Some(mut from) = self.blended(now_ms) else {
            return false;
        };
        from.x_base_domain = to.x_base_domain;
        from.x_visible_domain = to.x_visible_domain;
        self.begin_update(from, to, now_ms);
        self.update.is_some()
    }

    pub fn cancel_update(&mut self) {
        self.update = None;
    }

    #[must_use]
    pub fn has_update(&self) -> bool {
        self.update.is_some()
    }

    #[must_use]
    pub fn update_progress(&self, now_ms: f64) -> Option<f64> {
        self.update
            .as_ref()
            .map(|update| update.track.progress(now_ms))
    }

    /// Blended snapshot for `now_ms` while an update is in flight.
    #[must_use]
    pub fn blended(&self, now_ms: f64) -> Option<TransitionSnapshot> {
        let update = self.update.as_ref()?;
        Some(interpolate_snapshot(
            &update.from,
            &update.to,
            update.track.progress(now_ms),
            self.interpolation_cap,
        ))
    }

    /// Drops a finished update. Returns `true` when one was retired.
    pub fn retire_finished(&mut self, now_ms: f64) -> bool {
        let done = self
            .update
            .as_ref()
            .is_some_and(|update| update.track.phase(now_ms) == TrackPhase::Done);
        if done {
            self.update = None;
        }
        done
    }

    /// `true` while either track still needs frames.
    #[must_use]
    pub fn is_animating(&self, now_ms: f64) -> bool {
        if !self.config.enabled {
            return false;
        }
        let intro_active = self.intro.is_started() && self.intro.phase(now_ms) != TrackPhase::Done;
        let update_active = self
            .update
            .as_ref()
            .is_some_and(|update| update.track.phase(now_ms) != TrackPhase::Done);
        intro_active || update_active
    }

    #[must_use]
    pub fn status(&self, now_ms: f64) -> TransitionStatus {
        TransitionStatus {
            intro: self.intro_phase(now_ms),
            intro_progress: self.intro_progress(now_ms),
            update: self.update.as_ref().map(|update| update.track.phase(now_ms)),
            update_progress: self.update_progress(now_ms),
        }
    }
}
