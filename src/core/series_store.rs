use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::bounds::{Bounds, Extent};
use crate::core::types::{DataPoint, OhlcRecord, PieSlice, SeriesKind};

/// Columnar storage for point series. `size` is only allocated once any point
/// carries a size; indices without one hold `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointColumns {
    x: Vec<f64>,
    y: Vec<f64>,
    size: Option<Vec<Option<f64>>>,
    non_finite_x: usize,
}

impl PointColumns {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            size: None,
            non_finite_x: 0,
        }
    }

    #[must_use]
    pub fn from_points(points: &[DataPoint]) -> Self {
        let mut columns = Self::with_capacity(points.len());
        for point in points {
            columns.push(*point);
        }
        columns
    }

    pub fn push(&mut self, point: DataPoint) {
        self.push_parts(point.x, point.y, point.size);
    }

    pub fn push_parts(&mut self, x: f64, y: f64, size: Option<f64>) {
        if size.is_some() && self.size.is_none() {
            self.size = Some(vec![None; self.x.len()]);
        }
        if let Some(sizes) = self.size.as_mut() {
            sizes.push(size);
        }
        if !x.is_finite() {
            self.non_finite_x += 1;
        }
        self.x.push(x);
        self.y.push(y);
    }

    /// Appends parallel columns without materializing intermediate points.
    /// Extra elements of the longer column are ignored.
    pub fn extend_columns(&mut self, xs: &[f64], ys: &[f64], sizes: Option<&[f64]>) {
        let len = xs.len().min(ys.len());
        self.x.reserve(len);
        self.y.reserve(len);
        for i in 0..len {
            let size = sizes.and_then(|s| s.get(i).copied()).filter(|v| !v.is_nan());
            self.push_parts(xs[i], ys[i], size);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn sizes(&self) -> Option<&[Option<f64>]> {
        self.size.as_deref()
    }

    /// `true` when any x is NaN or infinite; binary-search paths are unreliable then.
    #[must_use]
    pub fn has_non_finite_x(&self) -> bool {
        self.non_finite_x > 0
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<DataPoint> {
        let x = *self.x.get(index)?;
        let y = *self.y.get(index)?;
        let size = self.size.as_ref().and_then(|s| s.get(index).copied().flatten());
        Some(DataPoint { x, y, size })
    }

    #[must_use]
    pub fn view(&self) -> PointView<'_> {
        PointView {
            x: &self.x,
            y: &self.y,
            size: self.size.as_deref(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = DataPoint> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }
}

/// Borrowed window over [`PointColumns`].
#[derive(Debug, Clone, Copy)]
pub struct PointView<'a> {
    pub x: &'a [f64],
    pub y: &'a [f64],
    pub size: Option<&'a [Option<f64>]>,
}

impl<'a> PointView<'a> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn size_at(&self, index: usize) -> Option<f64> {
        self.size.and_then(|s| s.get(index).copied().flatten())
    }

    #[must_use]
    pub fn sub(&self, range: Range<usize>) -> PointView<'a> {
        PointView {
            x: &self.x[range.clone()],
            y: &self.y[range.clone()],
            size: self.size.map(|s| &s[range]),
        }
    }

    #[must_use]
    pub fn to_columns(&self) -> PointColumns {
        let mut out = PointColumns::with_capacity(self.len());
        for i in 0..self.len() {
            out.push_parts(self.x[i], self.y[i], self.size_at(i));
        }
        out
    }
}

/// Columnar storage for candlestick series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcColumns {
    timestamp: Vec<f64>,
    open: Vec<f64>,
    close: Vec<f64>,
    low: Vec<f64>,
    high: Vec<f64>,
}

impl OhlcColumns {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamp: Vec::with_capacity(capacity),
            open: Vec::with_capacity(capacity),
            close: Vec::with_capacity(capacity),
            low: Vec::with_capacity(capacity),
            high: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn from_records(records: &[OhlcRecord]) -> Self {
        let mut columns = Self::with_capacity(records.len());
        for record in records {
            columns.push(*record);
        }
        columns
    }

    pub fn push(&mut self, record: OhlcRecord) {
        self.timestamp.push(record.timestamp);
        self.open.push(record.open);
        self.close.push(record.close);
        self.low.push(record.low);
        self.high.push(record.high);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }

    #[must_use]
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamp
    }

    #[must_use]
    pub fn has_non_finite_timestamp(&self) -> bool {
        self.timestamp.iter().any(|t| !t.is_finite())
    }

    #[must_use]
    pub fn record(&self, index: usize) -> Option<OhlcRecord> {
        Some(OhlcRecord {
            timestamp: *self.timestamp.get(index)?,
            open: *self.open.get(index)?,
            close: *self.close.get(index)?,
            low: *self.low.get(index)?,
            high: *self.high.get(index)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = OhlcRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }

    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> OhlcColumns {
        OhlcColumns {
            timestamp: self.timestamp[range.clone()].to_vec(),
            open: self.open[range.clone()].to_vec(),
            close: self.close[range.clone()].to_vec(),
            low: self.low[range.clone()].to_vec(),
            high: self.high[range].to_vec(),
        }
    }
}

/// Raw data of one series as supplied by the config resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum SeriesData {
    Points(Vec<DataPoint>),
    Ohlc(Vec<OhlcRecord>),
    Pie(Vec<PieSlice>),
}

/// Streaming append payload. `Columnar` batches are stored and applied without
/// building intermediate point values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppendBatch {
    Points(Vec<DataPoint>),
    Columnar {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default)]
        size: Option<Vec<f64>>,
    },
    Ohlc(Vec<OhlcRecord>),
}

impl AppendBatch {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Points(points) => points.len(),
            Self::Columnar { x, y, .. } => x.len().min(y.len()),
            Self::Ohlc(records) => records.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Column layout shared by raw storage, sampled caches and render series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesColumns {
    Points(PointColumns),
    Ohlc(OhlcColumns),
    Pie(Vec<PieSlice>),
}

impl SeriesColumns {
    #[must_use]
    pub fn from_data(data: &SeriesData) -> Self {
        match data {
            SeriesData::Points(points) => Self::Points(PointColumns::from_points(points)),
            SeriesData::Ohlc(records) => Self::Ohlc(OhlcColumns::from_records(records)),
            SeriesData::Pie(slices) => Self::Pie(slices.clone()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Points(columns) => columns.len(),
            Self::Ohlc(columns) => columns.len(),
            Self::Pie(slices) => slices.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_points(&self) -> Option<&PointColumns> {
        match self {
            Self::Points(columns) => Some(columns),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_ohlc(&self) -> Option<&OhlcColumns> {
        match self {
            Self::Ohlc(columns) => Some(columns),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_pie(&self) -> Option<&[PieSlice]> {
        match self {
            Self::Pie(slices) => Some(slices),
            _ => None,
        }
    }

    fn extent(&self) -> Extent {
        let mut extent = Extent::empty();
        match self {
            Self::Points(columns) => extent.include_columns(columns.x(), columns.y()),
            Self::Ohlc(columns) => {
                for record in columns.iter() {
                    extent.include_span(record.timestamp, record.low, record.high);
                }
            }
            Self::Pie(_) => {}
        }
        extent
    }
}

/// A decimation computed over a buffered x-window, reused while the visible
/// window stays inside `cached_range`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCacheEntry {
    pub data: Arc<SeriesColumns>,
    pub cached_range: (f64, f64),
    pub timestamp_ms: f64,
}

impl SampledCacheEntry {
    #[must_use]
    pub fn covers(&self, min: f64, max: f64) -> bool {
        self.cached_range.0 <= min && max <= self.cached_range.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(usize),
    Empty,
    UnknownSeries,
    NonCartesian,
    LayoutMismatch,
}

impl AppendOutcome {
    #[must_use]
    pub fn appended(self) -> usize {
        match self {
            Self::Appended(count) => count,
            _ => 0,
        }
    }
}

#[derive(Debug)]
struct SeriesEntry {
    kind: SeriesKind,
    columns: Arc<SeriesColumns>,
    extent: Extent,
    revision: u64,
    baseline: Option<Arc<SeriesColumns>>,
    sampled_cache: Option<SampledCacheEntry>,
}

/// Coordinator-owned runtime data for every registered series.
#[derive(Debug, Default)]
pub struct RuntimeSeriesStore {
    entries: Vec<Option<SeriesEntry>>,
    warned_rejections: HashSet<usize>,
}

impl RuntimeSeriesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a series wholesale, re-deriving columns and bounds in O(n).
    pub fn replace(&mut self, index: usize, kind: SeriesKind, data: &SeriesData) {
        let columns = SeriesColumns::from_data(data);
        let extent = columns.extent();
        let revision = self
            .entry(index)
            .map_or(0, |entry| entry.revision.wrapping_add(1));
        debug!(series = index, ?kind, len = columns.len(), "replace series data");
        if self.entries.len() <= index {
            self.entries.resize_with(index + 1, || None);
        }
        self.entries[index] = Some(SeriesEntry {
            kind,
            columns: Arc::new(columns),
            extent,
            revision,
            baseline: None,
            sampled_cache: None,
        });
    }

    /// Drops series whose index is `>= count`.
    pub fn truncate(&mut self, count: usize) {
        self.entries.truncate(count);
        self.warned_rejections.retain(|index| *index < count);
    }

    /// Appends in place, extends bounds and invalidates sampled caches.
    pub fn append(&mut self, index: usize, batch: &AppendBatch) -> AppendOutcome {
        let Some(entry) = self.entries.get_mut(index).and_then(Option::as_mut) else {
            return AppendOutcome::UnknownSeries;
        };
        if !entry.kind.is_cartesian() {
            if self.warned_rejections.insert(index) {
                warn!(series = index, "append ignored: pie series have no streaming semantics");
            }
            return AppendOutcome::NonCartesian;
        }
        if batch.is_empty() {
            return AppendOutcome::Empty;
        }

        let layout_matches = matches!(
            (entry.columns.as_ref(), batch),
            (SeriesColumns::Points(_), AppendBatch::Points(_) | AppendBatch::Columnar { .. })
                | (SeriesColumns::Ohlc(_), AppendBatch::Ohlc(_))
        );
        if !layout_matches {
            if self.warned_rejections.insert(index) {
                warn!(
                    series = index,
                    kind = ?entry.kind,
                    "append ignored: batch layout does not match series layout"
                );
            }
            return AppendOutcome::LayoutMismatch;
        }

        // Derived views release their handles first so the push stays in place
        // unless a rendered frame still shares the columns.
        entry.baseline = None;
        entry.sampled_cache = None;
        let appended = match (Arc::make_mut(&mut entry.columns), batch) {
            (SeriesColumns::Points(columns), AppendBatch::Points(points)) => {
                for point in points {
                    columns.push(*point);
                    entry.extent.include(point.x, point.y);
                }
                points.len()
            }
            (SeriesColumns::Points(columns), AppendBatch::Columnar { x, y, size }) => {
                columns.extend_columns(x, y, size.as_deref());
                let len = x.len().min(y.len());
                entry.extent.include_columns(&x[..len], &y[..len]);
                len
            }
            (SeriesColumns::Ohlc(columns), AppendBatch::Ohlc(records)) => {
                for record in records {
                    columns.push(*record);
                    entry
                        .extent
                        .include_span(record.timestamp, record.low, record.high);
                }
                records.len()
            }
            _ => return AppendOutcome::LayoutMismatch,
        };

        entry.revision = entry.revision.wrapping_add(1);
        trace!(series = index, appended, total = entry.columns.len(), "append series data");
        AppendOutcome::Appended(appended)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn kind(&self, index: usize) -> Option<SeriesKind> {
        self.entry(index).map(|entry| entry.kind)
    }

    #[must_use]
    pub fn columns(&self, index: usize) -> Option<&SeriesColumns> {
        self.entry(index).map(|entry| entry.columns.as_ref())
    }

    /// Shared handle to the raw columns; later appends copy on write while it is held.
    #[must_use]
    pub fn shared_columns(&self, index: usize) -> Option<Arc<SeriesColumns>> {
        self.entry(index).map(|entry| Arc::clone(&entry.columns))
    }

    /// Monotonic per-series change counter; bumps on every replace/append.
    #[must_use]
    pub fn revision(&self, index: usize) -> Option<u64> {
        self.entry(index).map(|entry| entry.revision)
    }

    #[must_use]
    pub fn bounds(&self, index: usize) -> Option<Bounds> {
        self.entry(index).and_then(|entry| entry.extent.bounds())
    }

    /// Bounds reduced over every Cartesian series.
    #[must_use]
    pub fn global_bounds(&self) -> Option<Bounds> {
        let mut extent = Extent::empty();
        for entry in self.entries.iter().flatten() {
            if entry.kind.is_cartesian() && !entry.extent.is_empty() {
                extent.merge(&entry.extent);
            }
        }
        extent.bounds()
    }

    #[must_use]
    pub fn point_count(&self, index: usize) -> usize {
        self.entry(index).map_or(0, |entry| entry.columns.len())
    }

    /// Largest Cartesian series length; drives the dataset-aware minimum zoom span.
    #[must_use]
    pub fn max_cartesian_point_count(&self) -> usize {
        self.entries
            .iter()
            .flatten()
            .filter(|entry| entry.kind.is_cartesian())
            .map(|entry| entry.columns.len())
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn baseline(&self, index: usize) -> Option<Arc<SeriesColumns>> {
        self.entry(index).and_then(|entry| entry.baseline.clone())
    }

    pub fn set_baseline(&mut self, index: usize, data: Arc<SeriesColumns>) {
        if let Some(entry) = self.entry_mut(index) {
            entry.baseline = Some(data);
        }
    }

    #[must_use]
    pub fn sampled_cache(&self, index: usize) -> Option<&SampledCacheEntry> {
        self.entry(index).and_then(|entry| entry.sampled_cache.as_ref())
    }

    pub fn set_sampled_cache(&mut self, index: usize, cache: SampledCacheEntry) {
        if let Some(entry) = self.entry_mut(index) {
            entry.sampled_cache = Some(cache);
        }
    }

    /// Drops baseline and sampled caches, e.g. after sampling options change.
    pub fn invalidate_caches(&mut self, index: usize) {
        if let Some(entry) = self.entry_mut(index) {
            entry.baseline = None;
            entry.sampled_cache = None;
        }
    }

    fn entry(&self, index: usize) -> Option<&SeriesEntry> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, index: usize) -> Option<&mut SeriesEntry> {
        self.entries.get_mut(index).and_then(Option::as_mut)
    }
}
