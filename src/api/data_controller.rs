use std::sync::Arc;

use tracing::{trace, warn};

use crate::core::{AppendBatch, SamplingStrategy, SeriesColumns};
use crate::host::FrameHost;
use crate::render::Renderer;

use super::ChartCoordinator;

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    /// Queues a streaming batch for `series_index`.
    ///
    /// The batch is applied at the next flush (display refresh or fallback
    /// timer, whichever fires first). Batches for pie series, unknown series
    /// or mismatched layouts are dropped at flush time with a one-time warning.
    pub fn append_data(&mut self, series_index: usize, batch: AppendBatch) {
        if self.core.runtime.disposed || batch.is_empty() {
            return;
        }
        let Some(record) = self.core.model.series.get(series_index) else {
            trace!(series = series_index, "append ignored: unknown series");
            return;
        };
        if record.kind.is_point_series()
            && record.sampling != SamplingStrategy::None
            && self.core.runtime.streaming_sampling_warned.insert(series_index)
        {
            warn!(
                series = series_index,
                sampling = ?record.sampling,
                "streaming append with sampling enabled re-samples the full series on every flush"
            );
        }

        trace!(series = series_index, len = batch.len(), "append queued");
        self.core.runtime.scheduler.enqueue(series_index, batch);
        self.core.runtime.scheduler.schedule(&mut self.host);
    }

    /// Applies any queued appends immediately instead of waiting for the
    /// next frame. Outstanding frame/timer triggers are cancelled.
    pub fn flush_now(&mut self) {
        if self.core.runtime.disposed {
            return;
        }
        self.flush_pending();
    }

    /// Raw point/candle/slice count currently held for `series_index`.
    #[must_use]
    pub fn raw_len(&self, series_index: usize) -> usize {
        if self.core.runtime.disposed {
            return 0;
        }
        self.core.model.store.point_count(series_index)
    }

    #[must_use]
    pub fn series_bounds(&self, series_index: usize) -> Option<crate::core::Bounds> {
        if self.core.runtime.disposed {
            return None;
        }
        self.core.model.store.bounds(series_index)
    }

    /// Shared handle to the raw columns of `series_index`.
    #[must_use]
    pub fn raw_columns(&self, series_index: usize) -> Option<Arc<SeriesColumns>> {
        if self.core.runtime.disposed {
            return None;
        }
        self.core.model.store.shared_columns(series_index)
    }

    #[must_use]
    pub fn pending_append_batches(&self) -> usize {
        self.core.runtime.scheduler.pending_batch_count()
    }
}
