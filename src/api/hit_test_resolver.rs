use crate::host::FrameHost;
use crate::interaction::{
    SeriesHit, find_bar_at, find_candle_at, find_nearest_point, find_pie_slice_at,
    find_points_at_x,
};
use crate::render::{RenderFrame, Renderer};

use super::ChartCoordinator;

/// Hit-tests take grid-local pixel coordinates and resolve against the last
/// rendered frame. Before the first `render()` every query misses.
impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    #[must_use]
    pub fn hit_test_nearest(&self, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
        let frame = self.hit_frame()?;
        find_nearest_point(frame, pointer_x, pointer_y, self.core.tuning.hit_test())
    }

    #[must_use]
    pub fn hit_test_bar(&self, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
        find_bar_at(self.hit_frame()?, pointer_x, pointer_y)
    }

    #[must_use]
    pub fn hit_test_candlestick(&self, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
        find_candle_at(self.hit_frame()?, pointer_x, pointer_y)
    }

    #[must_use]
    pub fn hit_test_pie(&self, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
        find_pie_slice_at(self.hit_frame()?, pointer_x, pointer_y)
    }

    /// Axis-trigger lookup: at most one element per visible Cartesian series.
    #[must_use]
    pub fn points_at_x(&self, pointer_x: f64, tolerance_px: Option<f64>) -> Vec<SeriesHit> {
        self.hit_frame()
            .map(|frame| find_points_at_x(frame, pointer_x, tolerance_px))
            .unwrap_or_default()
    }

    /// Item-trigger lookup: area marks (pie, candle, bar) take precedence over
    /// the nearest line/scatter point.
    #[must_use]
    pub fn hit_test(&self, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
        let frame = self.hit_frame()?;
        find_pie_slice_at(frame, pointer_x, pointer_y)
            .or_else(|| find_candle_at(frame, pointer_x, pointer_y))
            .or_else(|| find_bar_at(frame, pointer_x, pointer_y))
            .or_else(|| {
                find_nearest_point(frame, pointer_x, pointer_y, self.core.tuning.hit_test())
            })
    }

    fn hit_frame(&self) -> Option<&RenderFrame> {
        if self.core.runtime.disposed {
            return None;
        }
        self.core.runtime.last_frame.as_ref()
    }
}
