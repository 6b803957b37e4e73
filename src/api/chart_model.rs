use crate::core::auto_scroll::dataset_min_span;
use crate::core::{
    GridArea, PieSlice, ResolvedSeriesConfig, RuntimeSeriesStore, SamplingStrategy, SeriesData,
    SeriesKind, SeriesStyle, ZoomChangeSource, ZoomRange, ZoomState, normalize_domain,
};
use crate::interaction::InteractionXState;

use super::{AxisOverrides, DataZoomOptions};

/// Cheap identity of supplied series data: length plus edge values.
///
/// Re-supplying data with the same fingerprint keeps the runtime columns,
/// including anything streamed in since.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum DataFingerprint {
    Edges {
        len: usize,
        first: Option<[u64; 5]>,
        last: Option<[u64; 5]>,
    },
    Pie(Vec<PieSlice>),
}

impl DataFingerprint {
    pub(super) fn of(data: &SeriesData) -> Self {
        match data {
            SeriesData::Points(points) => {
                let bits = |index: usize| {
                    points.get(index).map(|point| {
                        [
                            point.x.to_bits(),
                            point.y.to_bits(),
                            point.size.map_or(u64::MAX, f64::to_bits),
                            0,
                            0,
                        ]
                    })
                };
                Self::Edges {
                    len: points.len(),
                    first: bits(0),
                    last: points.len().checked_sub(1).and_then(bits),
                }
            }
            SeriesData::Ohlc(records) => {
                let bits = |index: usize| {
                    records.get(index).map(|record| {
                        [
                            record.timestamp.to_bits(),
                            record.open.to_bits(),
                            record.close.to_bits(),
                            record.low.to_bits(),
                            record.high.to_bits(),
                        ]
                    })
                };
                Self::Edges {
                    len: records.len(),
                    first: bits(0),
                    last: records.len().checked_sub(1).and_then(bits),
                }
            }
            SeriesData::Pie(slices) => Self::Pie(slices.clone()),
        }
    }
}

/// Per-series options kept after the raw data moved into the store.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SeriesRecord {
    pub(super) kind: SeriesKind,
    pub(super) name: Option<String>,
    pub(super) visible: bool,
    pub(super) sampling: SamplingStrategy,
    pub(super) sampling_threshold: usize,
    pub(super) style: SeriesStyle,
    pub(super) fingerprint: DataFingerprint,
}

/// Data and view state owned by one coordinator.
pub(super) struct ChartModel {
    pub(super) grid_area: GridArea,
    pub(super) series: Vec<SeriesRecord>,
    pub(super) store: RuntimeSeriesStore,
    pub(super) x_axis: AxisOverrides,
    pub(super) y_axis: AxisOverrides,
    pub(super) zoom: ZoomState,
    pub(super) zoom_config: Option<DataZoomOptions>,
    pub(super) interaction_x: InteractionXState,
}

impl ChartModel {
    pub(super) fn new(grid_area: GridArea) -> Self {
        Self {
            grid_area,
            series: Vec::new(),
            store: RuntimeSeriesStore::new(),
            x_axis: AxisOverrides::default(),
            y_axis: AxisOverrides::default(),
            zoom: ZoomState::default(),
            zoom_config: None,
            interaction_x: InteractionXState::default(),
        }
    }

    pub(super) fn zoom_enabled(&self) -> bool {
        self.zoom_config.is_some()
    }

    pub(super) fn zoom_range(&self) -> ZoomRange {
        if self.zoom_enabled() {
            self.zoom.range()
        } else {
            ZoomRange::full()
        }
    }

    /// Auto-scroll applies only with a zoom window and no explicit x limits.
    pub(super) fn auto_scroll_enabled(&self) -> bool {
        self.zoom_enabled() && self.x_axis.is_unset()
    }

    pub(super) fn x_base_domain(&self) -> (f64, f64) {
        let data = self
            .store
            .global_bounds()
            .map_or((0.0, 1.0), |bounds| bounds.x_domain());
        let (min, max) = self.x_axis.apply(data);
        normalize_domain(min, max)
    }

    pub(super) fn y_base_domain(&self) -> (f64, f64) {
        let data = self
            .store
            .global_bounds()
            .map_or((0.0, 1.0), |bounds| bounds.y_domain());
        let (min, max) = self.y_axis.apply(data);
        normalize_domain(min, max)
    }

    pub(super) fn x_visible_domain(&self) -> (f64, f64) {
        let base = self.x_base_domain();
        let (min, max) = self.zoom_range().to_domain(base);
        normalize_domain(min, max)
    }

    /// Replaces changed series in the store. Returns `true` when any series
    /// data, kind, visibility or the series count changed.
    pub(super) fn apply_series_configs(&mut self, configs: Vec<ResolvedSeriesConfig>) -> bool {
        let mut changed = configs.len() != self.series.len();
        let mut records = Vec::with_capacity(configs.len());

        for (index, config) in configs.into_iter().enumerate() {
            let fingerprint = DataFingerprint::of(&config.data);
            let previous = self.series.get(index);
            let same_data = previous
                .is_some_and(|record| record.kind == config.kind && record.fingerprint == fingerprint)
                && self.store.kind(index) == Some(config.kind);

            if same_data {
                let sampling_changed = previous.is_some_and(|record| {
                    record.sampling != config.sampling
                        || record.sampling_threshold != config.sampling_threshold
                });
                if sampling_changed {
                    self.store.invalidate_caches(index);
                }
            } else {
                self.store.replace(index, config.kind, &config.data);
                changed = true;
            }
            if previous.is_some_and(|record| record.visible != config.visible) {
                changed = true;
            }

            records.push(SeriesRecord {
                kind: config.kind,
                name: config.name,
                visible: config.visible,
                sampling: config.sampling,
                sampling_threshold: config.sampling_threshold,
                style: config.style,
                fingerprint,
            });
        }

        self.store.truncate(records.len());
        self.series = records;
        changed
    }

    /// Re-applies `max(configured, dataset-aware)` minimum span.
    pub(super) fn refresh_span_constraints(&mut self, source: ZoomChangeSource) -> bool {
        let Some(config) = self.zoom_config else {
            return false;
        };
        let dataset_min = dataset_min_span(self.store.max_cartesian_point_count());
        let min_span = config.min_span.max(dataset_min);
        let max_span = config.max_span.max(min_span);
        if self.zoom.span_constraints() == (min_span, max_span) {
            return false;
        }
        self.zoom
            .set_span_constraints(min_span, max_span, Some(source))
    }
}
