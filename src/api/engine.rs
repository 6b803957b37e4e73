use tracing::{debug, trace};

use crate::core::GridArea;
use crate::error::ChartResult;
use crate::host::{FrameHandle, FrameHost, TimerHandle};
use crate::render::{RenderFrame, Renderer};

use super::{
    CoordinatorTuning, ResolvedOptions, chart_model::ChartModel, chart_runtime::ChartRuntimeState,
    engine_core::EngineCore,
};

/// Main orchestration facade consumed by host applications.
///
/// `ChartCoordinator` owns runtime series data, zoom state, the append flush
/// scheduler and transitions. It never blocks: deferred work is requested
/// from the [`FrameHost`] and resumed through [`ChartCoordinator::on_frame`]
/// and [`ChartCoordinator::on_timer`].
pub struct ChartCoordinator<R: Renderer, H: FrameHost> {
    pub(super) renderer: R,
    pub(super) host: H,
    pub(super) core: EngineCore,
}

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Creates a coordinator with default tuning and applies `options`.
    pub fn new(renderer: R, host: H, options: ResolvedOptions) -> ChartResult<Self> {
        Self::with_tuning(renderer, host, options, CoordinatorTuning::default())
    }

    pub fn with_tuning(
        renderer: R,
        host: H,
        options: ResolvedOptions,
        tuning: CoordinatorTuning,
    ) -> ChartResult<Self> {
        options.grid_area.validate()?;
        tuning.validate()?;

        let mut coordinator = Self {
            renderer,
            host,
            core: EngineCore {
                tuning,
                model: ChartModel::new(options.grid_area),
                runtime: ChartRuntimeState::new(&tuning),
            },
        };
        coordinator.set_options(options);
        debug!(
            series = coordinator.core.model.series.len(),
            "chart coordinator initialized"
        );
        Ok(coordinator)
    }

    #[must_use]
    pub fn tuning(&self) -> CoordinatorTuning {
        self.core.tuning
    }

    #[must_use]
    pub fn grid_area(&self) -> GridArea {
        self.core.model.grid_area
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.core.model.series.len()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.core.runtime.disposed
    }

    /// `true` when state changed since the last [`ChartCoordinator::render`].
    #[must_use]
    pub fn needs_render(&self) -> bool {
        !self.core.runtime.disposed && self.core.runtime.needs_render
    }

    /// Pulls the current frame and hands it to the renderer.
    pub fn render(&mut self) -> ChartResult<()> {
        if self.core.runtime.disposed {
            return Ok(());
        }
        let frame = self.build_frame()?;
        self.renderer.render(&frame)?;
        trace!(
            series = frame.series.len(),
            points = frame.visible_point_count(),
            intro_progress = frame.intro_progress,
            "render frame"
        );
        self.core.runtime.last_frame = Some(frame);
        self.core.runtime.needs_render = false;
        Ok(())
    }

    /// Last frame handed to the renderer; hit-tests resolve against it.
    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.core.runtime.last_frame.as_ref()
    }

    /// Display-refresh callback for a handle this coordinator requested.
    /// Unknown or stale handles are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if self.core.runtime.disposed {
            return;
        }
        if self.core.runtime.scheduler.owns_frame(handle) {
            self.flush_pending();
        }
        if self.core.runtime.animation_frame == Some(handle) {
            self.core.runtime.animation_frame = None;
            self.advance_animation();
        }
    }

    /// Timer callback for a handle this coordinator started.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        if self.core.runtime.disposed {
            return;
        }
        if self.core.runtime.scheduler.owns_timer(handle) {
            self.flush_pending();
        } else if self.core.runtime.zoom_debounce == Some(handle) {
            self.core.runtime.zoom_debounce = None;
            self.on_zoom_debounce_elapsed();
        }
    }

    /// Cancels outstanding host requests, clears listeners and turns every
    /// later call into a no-op.
    pub fn dispose(&mut self) {
        if self.core.runtime.disposed {
            return;
        }
        self.core.runtime.scheduler.cancel(&mut self.host);
        if let Some(timer) = self.core.runtime.zoom_debounce.take() {
            self.host.cancel_timer(timer);
        }
        if let Some(frame) = self.core.runtime.animation_frame.take() {
            self.host.cancel_frame(frame);
        }
        self.core.runtime.transitions.cancel_update();
        self.core.model.zoom.clear_listeners();
        self.core.model.interaction_x.clear_listeners();
        self.core.runtime.last_frame = None;
        self.core.runtime.disposed = true;
        debug!("chart coordinator disposed");
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_parts(self) -> (R, H) {
        (self.renderer, self.host)
    }
}
