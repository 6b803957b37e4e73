use tracing::trace;

use crate::core::{ListenerId, ZoomChange, ZoomChangeSource, ZoomRange};
use crate::host::FrameHost;
use crate::render::Renderer;

use super::ChartCoordinator;

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Current zoom window, or `None` when zoom is not configured.
    #[must_use]
    pub fn zoom_range(&self) -> Option<ZoomRange> {
        if self.core.runtime.disposed || !self.core.model.zoom_enabled() {
            return None;
        }
        Some(self.core.model.zoom.range())
    }

    /// `(min_span, max_span)` currently enforced, including the dataset-aware minimum.
    #[must_use]
    pub fn zoom_span_constraints(&self) -> Option<(f64, f64)> {
        if self.core.runtime.disposed || !self.core.model.zoom_enabled() {
            return None;
        }
        Some(self.core.model.zoom.span_constraints())
    }

    /// API-driven window change. Returns `true` when the clamped window moved.
    pub fn set_zoom_range(&mut self, start: f64, end: f64) -> bool {
        self.set_zoom_range_from(start, end, ZoomChangeSource::Api)
    }

    pub fn set_zoom_range_from(&mut self, start: f64, end: f64, source: ZoomChangeSource) -> bool {
        if !self.zoom_operable() {
            return false;
        }
        let changed = self.core.model.zoom.set_range(start, end, Some(source));
        self.after_zoom_change(changed, source)
    }

    /// User pan by `delta_percent` of the base domain.
    pub fn pan_zoom(&mut self, delta_percent: f64) -> bool {
        if !self.zoom_operable() {
            return false;
        }
        let changed = self
            .core
            .model
            .zoom
            .pan(delta_percent, Some(ZoomChangeSource::User));
        self.after_zoom_change(changed, ZoomChangeSource::User)
    }

    /// User zoom-in around `center_percent`; `factor` must exceed 1.
    pub fn zoom_in(&mut self, center_percent: f64, factor: f64) -> bool {
        if !self.zoom_operable() {
            return false;
        }
        let changed = self
            .core
            .model
            .zoom
            .zoom_in(center_percent, factor, Some(ZoomChangeSource::User));
        self.after_zoom_change(changed, ZoomChangeSource::User)
    }

    pub fn zoom_out(&mut self, center_percent: f64, factor: f64) -> bool {
        if !self.zoom_operable() {
            return false;
        }
        let changed = self
            .core
            .model
            .zoom
            .zoom_out(center_percent, factor, Some(ZoomChangeSource::User));
        self.after_zoom_change(changed, ZoomChangeSource::User)
    }

    /// Registers a zoom-window listener. Listeners survive option changes.
    pub fn on_zoom_range_change(
        &mut self,
        callback: impl FnMut(&ZoomChange) + 'static,
    ) -> Option<ListenerId> {
        if self.core.runtime.disposed {
            return None;
        }
        Some(self.core.model.zoom.subscribe(callback))
    }

    pub fn off_zoom_range_change(&mut self, id: ListenerId) -> bool {
        if self.core.runtime.disposed {
            return false;
        }
        self.core.model.zoom.unsubscribe(id)
    }

    fn zoom_operable(&self) -> bool {
        !self.core.runtime.disposed && self.core.model.zoom_enabled()
    }

    /// Restarts the resample debounce after any non-auto-scroll change and
    /// keeps a running update transition on the new window.
    pub(super) fn after_zoom_change(&mut self, changed: bool, source: ZoomChangeSource) -> bool {
        if !changed {
            return false;
        }
        self.core.runtime.needs_render = true;
        if source != ZoomChangeSource::AutoScroll {
            self.restart_zoom_debounce();
        }
        self.rebase_running_update();
        trace!(?source, range = ?self.core.model.zoom.range(), "zoom window changed");
        true
    }

    fn restart_zoom_debounce(&mut self) {
        if let Some(previous) = self.core.runtime.zoom_debounce.take() {
            self.host.cancel_timer(previous);
        }
        let delay = self.core.tuning.zoom_resample_debounce_ms;
        self.core.runtime.zoom_debounce = Some(self.host.start_timer(delay));
    }

    /// Zoom input settled: resample through the unified flush.
    pub(super) fn on_zoom_debounce_elapsed(&mut self) {
        let runtime = &mut self.core.runtime;
        runtime.scheduler.mark_resample_due();
        runtime.scheduler.schedule(&mut self.host);
    }
}
