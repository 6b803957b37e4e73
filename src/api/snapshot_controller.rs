use crate::error::{ChartError, ChartResult};
use crate::host::FrameHost;
use crate::render::Renderer;

use super::{ChartCoordinator, CoordinatorSnapshot, SchedulerSnapshot, SeriesSnapshot};

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Builds a deterministic snapshot of runtime state.
    #[must_use]
    pub fn snapshot(&self) -> CoordinatorSnapshot {
        let model = &self.core.model;
        let runtime = &self.core.runtime;
        let series = model
            .series
            .iter()
            .enumerate()
            .map(|(index, record)| SeriesSnapshot {
                index,
                kind: record.kind,
                name: record.name.clone(),
                visible: record.visible,
                sampling: record.sampling,
                raw_count: model.store.point_count(index),
                bounds: model.store.bounds(index),
                revision: model.store.revision(index).unwrap_or_default(),
                has_sampled_cache: model.store.sampled_cache(index).is_some(),
                streaming_sampling_warned: runtime.streaming_sampling_warned.contains(&index),
            })
            .collect();

        CoordinatorSnapshot {
            disposed: runtime.disposed,
            x_base_domain: model.x_base_domain(),
            x_visible_domain: model.x_visible_domain(),
            y_domain: model.y_base_domain(),
            zoom_range: model.zoom_enabled().then(|| model.zoom.range()),
            zoom_span_constraints: model.zoom_enabled().then(|| model.zoom.span_constraints()),
            series,
            scheduler: SchedulerSnapshot {
                phase: runtime.scheduler.state().phase(),
                pending_batches: runtime.scheduler.pending_batch_count(),
                resample_due: runtime.scheduler.resample_due(),
                zoom_debounce_pending: runtime.zoom_debounce.is_some(),
            },
            transitions: runtime.transitions.status(self.host.now_ms()),
            interaction_x: model.interaction_x.x(),
        }
    }

    /// Serializes the snapshot as pretty JSON for fixture-based checks.
    pub fn snapshot_json(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
