mod frame;
mod null_renderer;

pub use frame::{RenderFrame, RenderSeries};
pub use null_renderer::NullRenderer;

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully resolved `RenderFrame` (scales, grid area and
/// render series) and only draw; they never mutate coordinator state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
