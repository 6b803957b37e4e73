use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::series_store::AppendBatch;
use crate::host::{FrameHandle, FrameHost, TimerHandle};

/// Lifecycle of one pending batch window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlushState {
    Idle,
    Scheduled {
        frame: FrameHandle,
        timer: TimerHandle,
        scheduled_at_ms: f64,
    },
    Flushing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlushPhase {
    Idle,
    Scheduled,
    Flushing,
}

impl FlushState {
    #[must_use]
    pub fn phase(self) -> FlushPhase {
        match self {
            Self::Idle => FlushPhase::Idle,
            Self::Scheduled { .. } => FlushPhase::Scheduled,
            Self::Flushing => FlushPhase::Flushing,
        }
    }
}

/// Work taken out of the scheduler at flush time.
#[derive(Debug, Default)]
pub struct FlushBatch {
    /// Pending appends per series, in first-append order; batches in call order.
    pub appends: IndexMap<usize, Vec<AppendBatch>>,
    pub resample_due: bool,
    /// Time between scheduling and flushing.
    pub latency_ms: f64,
}

/// Coalesces appends and resample requests into at most one flush per frame.
///
/// Two triggers race for each scheduled window, the next display refresh and a
/// fallback timer; whichever fires first flushes and cancels the other.
#[derive(Debug)]
pub struct AppendFlushScheduler {
    state: FlushState,
    pending: IndexMap<usize, Vec<AppendBatch>>,
    resample_due: bool,
    fallback_ms: f64,
}

impl AppendFlushScheduler {
    #[must_use]
    pub fn new(fallback_ms: f64) -> Self {
        Self {
            state: FlushState::Idle,
            pending: IndexMap::new(),
            resample_due: false,
            fallback_ms,
        }
    }

    #[must_use]
    pub fn state(&self) -> FlushState {
        self.state
    }

    #[must_use]
    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_empty() || self.resample_due
    }

    #[must_use]
    pub fn pending_batch_count(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn resample_due(&self) -> bool {
        self.resample_due
    }

    /// Stores the batch as-is; no per-point copies are made here.
    pub fn enqueue(&mut self, series_index: usize, batch: AppendBatch) {
        self.pending.entry(series_index).or_default().push(batch);
    }

    pub fn mark_resample_due(&mut self) {
        self.resample_due = true;
    }

    /// Moves `Idle -> Scheduled`. No-op while a window is already scheduled or
    /// being flushed; returns `true` when new host requests were issued.
    pub fn schedule<H: FrameHost>(&mut self, host: &mut H) -> bool {
        if self.state != FlushState::Idle {
            return false;
        }
        let frame = host.request_frame();
        let timer = host.start_timer(self.fallback_ms);
        self.state = FlushState::Scheduled {
            frame,
            timer,
            scheduled_at_ms: host.now_ms(),
        };
        true
    }

    #[must_use]
    pub fn owns_frame(&self, handle: FrameHandle) -> bool {
        matches!(self.state, FlushState::Scheduled { frame, .. } if frame == handle)
    }

    #[must_use]
    pub fn owns_timer(&self, handle: TimerHandle) -> bool {
        matches!(self.state, FlushState::Scheduled { timer, .. } if timer == handle)
    }

    /// Cancels both triggers unconditionally and enters `Flushing`.
    /// Returns `None` when nothing was scheduled.
    pub fn begin_flush<H: FrameHost>(&mut self, host: &mut H) -> Option<FlushBatch> {
        let FlushState::Scheduled {
            frame,
            timer,
            scheduled_at_ms,
        } = self.state
        else {
            return None;
        };
        host.cancel_frame(frame);
        host.cancel_timer(timer);
        self.state = FlushState::Flushing;
        Some(FlushBatch {
            appends: std::mem::take(&mut self.pending),
            resample_due: std::mem::take(&mut self.resample_due),
            latency_ms: host.now_ms() - scheduled_at_ms,
        })
    }

    /// Returns to `Idle`; work queued during the flush is rescheduled.
    pub fn finish_flush<H: FrameHost>(&mut self, host: &mut H) {
        if self.state == FlushState::Flushing {
            self.state = FlushState::Idle;
        }
        if self.has_pending_work() {
            self.schedule(host);
        }
    }

    /// Drops all pending work and cancels outstanding triggers.
    pub fn cancel<H: FrameHost>(&mut self, host: &mut H) {
        if let FlushState::Scheduled { frame, timer, .. } = self.state {
            host.cancel_frame(frame);
            host.cancel_timer(timer);
        }
        self.state = FlushState::Idle;
        self.pending.clear();
        self.resample_due = false;
    }
}
