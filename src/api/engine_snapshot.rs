use serde::{Deserialize, Serialize};

use crate::animation::TransitionStatus;
use crate::core::{Bounds, FlushPhase, SamplingStrategy, SeriesKind, ZoomRange};

/// Per-series runtime counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub index: usize,
    pub kind: SeriesKind,
    pub name: Option<String>,
    pub visible: bool,
    pub sampling: SamplingStrategy,
    pub raw_count: usize,
    pub bounds: Option<Bounds>,
    /// Bumped on every replace or append.
    pub revision: u64,
    pub has_sampled_cache: bool,
    /// Streaming append was combined with sampling; warned once.
    #[serde(default)]
    pub streaming_sampling_warned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    pub phase: FlushPhase,
    pub pending_batches: usize,
    pub resample_due: bool,
    pub zoom_debounce_pending: bool,
}

/// Serializable coordinator state used by regression tests and debugging
/// tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorSnapshot {
    pub disposed: bool,
    pub x_base_domain: (f64, f64),
    pub x_visible_domain: (f64, f64),
    pub y_domain: (f64, f64),
    /// `None` when zoom is not configured.
    pub zoom_range: Option<ZoomRange>,
    pub zoom_span_constraints: Option<(f64, f64)>,
    pub series: Vec<SeriesSnapshot>,
    pub scheduler: SchedulerSnapshot,
    pub transitions: TransitionStatus,
    pub interaction_x: Option<f64>,
}
