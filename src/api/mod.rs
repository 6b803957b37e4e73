//! Caller-facing coordinator facade.
//!
//! `ChartCoordinator` is split across files by concern: each `*_controller`
//! adds one group of public operations, while `chart_model` and
//! `chart_runtime` hold the state they act on.

mod chart_model;
mod chart_runtime;
mod data_controller;
mod engine;
mod engine_core;
mod engine_snapshot;
mod flush_controller;
mod hit_test_resolver;
mod interaction_controller;
mod options;
mod options_controller;
mod render_coordinator;
mod series_projection;
mod snapshot_controller;
mod tuning;
mod zoom_controller;

pub use engine::ChartCoordinator;
pub use engine_snapshot::{CoordinatorSnapshot, SchedulerSnapshot, SeriesSnapshot};
pub use options::{AxisOverrides, DataZoomOptions, ResolvedOptions};
pub use tuning::CoordinatorTuning;
