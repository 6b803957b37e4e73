use tracing::{debug, trace};

use crate::core::ZoomChangeSource;
use crate::core::auto_scroll::auto_scroll_window;
use crate::host::FrameHost;
use crate::render::Renderer;

use super::ChartCoordinator;

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Applies pending appends, auto-scroll and any due resample in one pass.
    ///
    /// Data mutation always happens before resampling.
    pub(super) fn flush_pending(&mut self) {
        let Some(batch) = self.core.runtime.scheduler.begin_flush(&mut self.host) else {
            return;
        };
        let now = self.host.now_ms();
        let frame_budget = self.core.tuning.flush_fallback_ms * self.core.tuning.frame_drop_factor;
        if batch.latency_ms > frame_budget {
            debug!(
                latency_ms = batch.latency_ms,
                budget_ms = frame_budget,
                "append flush exceeded frame budget"
            );
        }

        let model = &mut self.core.model;
        let previous_range = model.zoom_range();
        let previous_visible = model.x_visible_domain();

        let mut appended = 0;
        for (series_index, batches) in batch.appends {
            for pending in &batches {
                appended += model.store.append(series_index, pending).appended();
            }
        }

        let mut resample_due = batch.resample_due;
        if appended > 0 {
            model.refresh_span_constraints(ZoomChangeSource::AutoScroll);
            if model.auto_scroll_enabled() {
                if let Some(window) = auto_scroll_window(
                    previous_range,
                    previous_visible,
                    model.x_base_domain(),
                    self.core.tuning.pinned_end_threshold,
                ) {
                    model
                        .zoom
                        .set_range(window.start, window.end, Some(ZoomChangeSource::AutoScroll));
                }
            }
            if model.zoom_enabled() && !model.zoom_range().is_full_span() {
                resample_due = true;
            }
        }

        let resampled = if resample_due {
            model.resample_visible(&self.core.tuning, now)
        } else {
            0
        };

        trace!(
            appended,
            resampled,
            latency_ms = batch.latency_ms,
            "append flush"
        );
        self.core.runtime.needs_render = true;
        self.core.runtime.scheduler.finish_flush(&mut self.host);
        if appended > 0 || resampled > 0 {
            self.rebase_running_update();
        }
    }
}
