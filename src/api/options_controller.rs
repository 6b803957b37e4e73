use tracing::{debug, trace, warn};

use crate::core::ZoomChangeSource;
use crate::host::FrameHost;
use crate::render::Renderer;

use super::{ChartCoordinator, ResolvedOptions};

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Applies a new resolved option set.
    ///
    /// Pending appends are flushed first so they land before the new data is
    /// compared. When series data or a base domain changed, an update
    /// transition starts from the currently displayed (possibly blended) state.
    pub fn set_options(&mut self, options: ResolvedOptions) {
        if self.core.runtime.disposed {
            return;
        }
        if let Err(err) = options.grid_area.validate() {
            warn!(error = %err, "options ignored: invalid grid area");
            return;
        }
        self.flush_pending();

        let now = self.host.now_ms();
        let animate = options.animation.enabled && self.core.runtime.has_options;
        let from = if animate {
            Some(match self.core.runtime.transitions.blended(now) {
                Some(blended) => blended,
                None => self.core.model.capture_snapshot(),
            })
        } else {
            None
        };
        let previous_x_visible = self.core.model.x_visible_domain();
        let previous_y = self.core.model.y_base_domain();
        let previous_zoom = self.core.model.zoom_config;

        let model = &mut self.core.model;
        let series_count = options.series.len();
        let data_changed = model.apply_series_configs(options.series);
        model.grid_area = options.grid_area;
        model.x_axis = options.x_axis;
        model.y_axis = options.y_axis;
        model.zoom_config = options.data_zoom;

        if let Some(config) = options.data_zoom {
            let constraints_moved = model.refresh_span_constraints(ZoomChangeSource::Api);
            let window_configured = previous_zoom
                .is_none_or(|previous| previous.start != config.start || previous.end != config.end);
            let window_moved = window_configured
                && model
                    .zoom
                    .set_range(config.start, config.end, Some(ZoomChangeSource::Api));
            self.after_zoom_change(constraints_moved || window_moved, ZoomChangeSource::Api);
        }

        // New data is resampled for the zoomed window before the target
        // snapshot is taken, so the update ends on the final rendition.
        let model = &mut self.core.model;
        if data_changed && model.zoom_enabled() && !model.zoom_range().is_full_span() {
            let resampled = model.resample_visible(&self.core.tuning, now);
            trace!(resampled, "resampled zoomed window for new options");
        }

        let model = &self.core.model;
        let domain_changed = previous_x_visible != model.x_visible_domain()
            || previous_y != model.y_base_domain();
        self.core.runtime.transitions.set_config(options.animation);
        if let Some(from) = from.filter(|_| data_changed || domain_changed) {
            let to = self.core.model.capture_snapshot();
            self.core.runtime.transitions.begin_update(from, to, now);
            self.ensure_animation_frame();
        }

        self.core.runtime.needs_render = true;
        self.core.runtime.has_options = true;
        debug!(
            series = series_count,
            data_changed,
            domain_changed,
            zoom = ?self.core.model.zoom_config.map(|_| self.core.model.zoom.range()),
            "options applied"
        );
    }
}
