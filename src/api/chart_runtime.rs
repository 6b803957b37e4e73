use std::collections::HashSet;

use crate::animation::{AnimationConfig, TransitionController};
use crate::core::AppendFlushScheduler;
use crate::host::{FrameHandle, TimerHandle};
use crate::render::RenderFrame;

use super::CoordinatorTuning;

/// Scheduling and lifecycle state grouped separately from the chart model.
pub(super) struct ChartRuntimeState {
    pub(super) disposed: bool,
    pub(super) has_options: bool,
    pub(super) needs_render: bool,
    pub(super) scheduler: AppendFlushScheduler,
    pub(super) transitions: TransitionController,
    pub(super) zoom_debounce: Option<TimerHandle>,
    pub(super) animation_frame: Option<FrameHandle>,
    /// Frame every hit-test resolves against.
    pub(super) last_frame: Option<RenderFrame>,
    pub(super) streaming_sampling_warned: HashSet<usize>,
}

impl ChartRuntimeState {
    pub(super) fn new(tuning: &CoordinatorTuning) -> Self {
        Self {
            disposed: false,
            has_options: false,
            needs_render: true,
            scheduler: AppendFlushScheduler::new(tuning.flush_fallback_ms),
            transitions: TransitionController::new(
                AnimationConfig::default(),
                tuning.interpolation_cap,
            ),
            zoom_debounce: None,
            animation_frame: None,
            last_frame: None,
            streaming_sampling_warned: HashSet::new(),
        }
    }
}
