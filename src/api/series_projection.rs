use std::sync::Arc;

use tracing::trace;

use crate::animation::TransitionSnapshot;
use crate::core::sampling::{effective_sampling_target, sample_ohlc, sample_points, sample_series};
use crate::core::windowing::{buffered_window, slice_candles, slice_point_view, slice_series};
use crate::core::{SampledCacheEntry, SamplingStrategy, SeriesColumns};
use crate::render::RenderSeries;

use super::{CoordinatorTuning, chart_model::ChartModel};

impl ChartModel {
    /// Render series for the current zoom window.
    ///
    /// Full-span windows draw the per-series baseline (raw data sampled with
    /// the base threshold). Zoomed windows slice a covering sampled cache, or
    /// the baseline until the debounced resample lands.
    pub(super) fn project_render_series(&mut self) -> Vec<RenderSeries> {
        let visible = self.x_visible_domain();
        let full_span = self.zoom_range().is_full_span();
        (0..self.series.len())
            .filter_map(|index| {
                let data = self.project_series_data(index, visible, full_span)?;
                let record = &self.series[index];
                Some(RenderSeries {
                    index,
                    kind: record.kind,
                    name: record.name.clone(),
                    visible: record.visible,
                    data,
                    style: record.style.clone(),
                })
            })
            .collect()
    }

    pub(super) fn capture_snapshot(&mut self) -> TransitionSnapshot {
        TransitionSnapshot {
            x_base_domain: self.x_base_domain(),
            x_visible_domain: self.x_visible_domain(),
            y_base_domain: self.y_base_domain(),
            series: self.project_render_series(),
        }
    }

    fn project_series_data(
        &mut self,
        index: usize,
        visible: (f64, f64),
        full_span: bool,
    ) -> Option<Arc<SeriesColumns>> {
        let record = self.series.get(index)?;
        if !record.kind.is_cartesian() || full_span {
            return self.baseline(index);
        }
        if record.sampling == SamplingStrategy::None {
            let raw = self.store.columns(index)?;
            return Some(Arc::new(slice_series(raw, visible.0, visible.1)));
        }
        if let Some(cache) = self
            .store
            .sampled_cache(index)
            .filter(|cache| cache.covers(visible.0, visible.1))
        {
            return Some(Arc::new(slice_series(&cache.data, visible.0, visible.1)));
        }
        let baseline = self.baseline(index)?;
        Some(Arc::new(slice_series(&baseline, visible.0, visible.1)))
    }

    /// Full-span rendition of one series, cached until its data changes.
    /// Unsampled series share the raw columns instead of copying them.
    fn baseline(&mut self, index: usize) -> Option<Arc<SeriesColumns>> {
        if let Some(baseline) = self.store.baseline(index) {
            return Some(baseline);
        }
        let record = self.series.get(index)?;
        let data = if record.sampling == SamplingStrategy::None || !record.kind.is_cartesian() {
            self.store.shared_columns(index)?
        } else {
            let raw = self.store.columns(index)?;
            Arc::new(sample_series(raw, record.sampling, record.sampling_threshold))
        };
        self.store.set_baseline(index, Arc::clone(&data));
        Some(data)
    }

    /// Re-samples every sampled series over the buffered visible window.
    /// Returns the number of refreshed cache entries.
    pub(super) fn resample_visible(&mut self, tuning: &CoordinatorTuning, now_ms: f64) -> usize {
        let range = self.zoom_range();
        if range.is_full_span() {
            return 0;
        }
        let visible = self.x_visible_domain();
        let (buffer_min, buffer_max) = buffered_window(visible.0, visible.1, tuning.buffer_fraction);
        let span_fraction = range.span() / 100.0;

        let mut refreshed = 0;
        for index in 0..self.series.len() {
            let record = &self.series[index];
            if record.sampling == SamplingStrategy::None || !record.kind.is_cartesian() {
                continue;
            }
            let target = effective_sampling_target(
                record.sampling_threshold,
                span_fraction,
                tuning.sampling_limits(),
            );
            let sampled = match self.store.columns(index) {
                Some(SeriesColumns::Points(points)) => SeriesColumns::Points(sample_points(
                    slice_point_view(points.view(), buffer_min, buffer_max),
                    record.sampling,
                    target,
                )),
                Some(SeriesColumns::Ohlc(candles)) => SeriesColumns::Ohlc(sample_ohlc(
                    &slice_candles(candles, buffer_min, buffer_max),
                    target,
                )),
                _ => continue,
            };
            trace!(series = index, target, sampled = sampled.len(), "resampled visible window");
            self.store.set_sampled_cache(
                index,
                SampledCacheEntry {
                    data: Arc::new(sampled),
                    cached_range: (buffer_min, buffer_max),
                    timestamp_ms: now_ms,
                },
            );
            refreshed += 1;
        }
        refreshed
    }
}
