use tracing::trace;

use crate::core::{LinearScale, normalize_domain};
use crate::error::ChartResult;
use crate::host::FrameHost;
use crate::render::{RenderFrame, RenderSeries, Renderer};

use super::ChartCoordinator;

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Resolves scales and render series for `now`, blending a running update
    /// transition when there is one.
    pub(super) fn build_frame(&mut self) -> ChartResult<RenderFrame> {
        let now = self.host.now_ms();
        let runtime = &mut self.core.runtime;
        runtime.transitions.retire_finished(now);
        let snapshot = match runtime.transitions.blended(now) {
            Some(blended) => blended,
            None => self.core.model.capture_snapshot(),
        };

        let has_mark = snapshot.series.iter().any(RenderSeries::has_drawable_mark);
        if self
            .core
            .runtime
            .transitions
            .maybe_start_intro(now, has_mark)
        {
            self.ensure_animation_frame();
        }

        let grid = self.core.model.grid_area;
        let x_visible = normalize_domain(snapshot.x_visible_domain.0, snapshot.x_visible_domain.1);
        let y_domain = normalize_domain(snapshot.y_base_domain.0, snapshot.y_base_domain.1);
        let x_scale = LinearScale::new(x_visible, (0.0, grid.width))?;
        let y_scale = LinearScale::new(y_domain, (grid.height, 0.0))?;

        Ok(RenderFrame {
            grid_area: grid,
            x_scale,
            y_scale,
            x_base_domain: snapshot.x_base_domain,
            x_visible_domain: x_visible,
            y_domain,
            series: snapshot.series,
            intro_progress: self.core.runtime.transitions.intro_progress(now),
        })
    }

    /// Requests one display refresh for transitions unless one is outstanding.
    pub(super) fn ensure_animation_frame(&mut self) {
        if self.core.runtime.animation_frame.is_none() {
            self.core.runtime.animation_frame = Some(self.host.request_frame());
        }
    }

    /// Points a running update at the live state after navigation or a flush,
    /// so the drawn window and hit-tests follow `zoom_range()` immediately.
    pub(super) fn rebase_running_update(&mut self) {
        if !self.core.runtime.transitions.has_update() {
            return;
        }
        let now = self.host.now_ms();
        let to = self.core.model.capture_snapshot();
        if self.core.runtime.transitions.rebase_update(to, now) {
            trace!(now, "update transition rebased onto live state");
            self.ensure_animation_frame();
        }
    }

    /// Animation tick: marks the frame dirty and keeps ticking while a track runs.
    pub(super) fn advance_animation(&mut self) {
        let now = self.host.now_ms();
        self.core.runtime.needs_render = true;
        if self.core.runtime.transitions.retire_finished(now) {
            trace!(now, "update transition finished");
        }
        if self.core.runtime.transitions.is_animating(now) {
            self.ensure_animation_frame();
        }
    }
}
