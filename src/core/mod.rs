pub mod auto_scroll;
pub mod bounds;
pub mod flush_scheduler;
pub mod listeners;
pub mod primitives;
pub mod sampling;
pub mod scale;
pub mod series_options;
pub mod series_store;
pub mod types;
pub mod windowing;
pub mod zoom;

pub use bounds::{Bounds, Extent, normalize_domain};
pub use flush_scheduler::{AppendFlushScheduler, FlushPhase, FlushState};
pub use listeners::{ListenerId, ListenerSet};
pub use sampling::{SamplingStrategy, SamplingTargetLimits};
pub use scale::LinearScale;
pub use series_options::{
    BarLayoutOptions, CandlestickOptions, Dimension, PieGeometry, ResolvedSeriesConfig,
    SeriesStyle,
};
pub use series_store::{
    AppendBatch, AppendOutcome, OhlcColumns, PointColumns, PointView, RuntimeSeriesStore,
    SampledCacheEntry, SeriesColumns, SeriesData,
};
pub use types::{DataPoint, GridArea, OhlcRecord, PieSlice, SeriesKind};
pub use zoom::{ZoomChange, ZoomChangeSource, ZoomRange, ZoomState};
