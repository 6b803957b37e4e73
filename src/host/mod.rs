//! Host scheduling seam.
//!
//! The coordinator never blocks. Future work is requested from the host as a
//! display-refresh callback or a timer, and the host hands the returned handle
//! back through `ChartCoordinator::on_frame` / `ChartCoordinator::on_timer`.

mod manual;

pub use manual::ManualFrameHost;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Clock plus cancellable display-refresh and timer requests.
pub trait FrameHost {
    /// Monotonic time in milliseconds.
    fn now_ms(&self) -> f64;

    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn start_timer(&mut self, delay_ms: f64) -> TimerHandle;

    fn cancel_timer(&mut self, handle: TimerHandle);
}
