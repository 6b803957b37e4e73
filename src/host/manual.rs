use indexmap::{IndexMap, IndexSet};

use super::{FrameHandle, FrameHost, TimerHandle};

/// Deterministic host for tests and headless embedding.
///
/// Time only moves through [`ManualFrameHost::set_now`] / [`ManualFrameHost::advance`];
/// requested frames and timers are queued until the embedder dispatches them.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    now_ms: f64,
    next_id: u64,
    frames: IndexSet<FrameHandle>,
    timers: IndexMap<TimerHandle, f64>,
    cancelled_frames: usize,
    cancelled_timers: usize,
}

impl ManualFrameHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    pub fn set_now(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.now_ms += delta_ms;
    }

    /// Frame requests still outstanding, oldest first.
    #[must_use]
    pub fn pending_frames(&self) -> Vec<FrameHandle> {
        self.frames.iter().copied().collect()
    }

    /// Removes and returns every outstanding frame request.
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        self.frames.drain(..).collect()
    }

    #[must_use]
    pub fn pending_timers(&self) -> Vec<(TimerHandle, f64)> {
        self.timers.iter().map(|(h, due)| (*h, *due)).collect()
    }

    /// Removes and returns timers due at the current time, earliest first.
    pub fn take_due_timers(&mut self) -> Vec<TimerHandle> {
        let now = self.now_ms;
        let mut due: Vec<(TimerHandle, f64)> = self
            .timers
            .iter()
            .filter(|(_, due)| **due <= now)
            .map(|(h, due)| (*h, *due))
            .collect();
        due.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        for (handle, _) in &due {
            self.timers.shift_remove(handle);
        }
        due.into_iter().map(|(h, _)| h).collect()
    }

    #[must_use]
    pub fn cancelled_counts(&self) -> (usize, usize) {
        (self.cancelled_frames, self.cancelled_timers)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameHost for ManualFrameHost {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.frames.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.frames.shift_remove(&handle) {
            self.cancelled_frames += 1;
        }
    }

    fn start_timer(&mut self, delay_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        let delay = if delay_ms.is_finite() { delay_ms.max(0.0) } else { 0.0 };
        self.timers.insert(handle, self.now_ms + delay);
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        if self.timers.shift_remove(&handle).is_some() {
            self.cancelled_timers += 1;
        }
    }
}
