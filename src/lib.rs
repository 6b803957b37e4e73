//! chart-coordinator: data and interaction core for interactive charts.
//!
//! The crate owns everything between resolved chart options and a renderer:
//! streaming series storage, zoom-aware sampling and slicing, the append
//! flush scheduler, intro/update transitions and pointer hit-testing. Drawing
//! is delegated to a [`render::Renderer`]; clocks, display refreshes and
//! timers come from a [`host::FrameHost`].

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod host;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartCoordinator, CoordinatorTuning, ResolvedOptions};
pub use error::{ChartError, ChartResult};
