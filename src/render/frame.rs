use std::sync::Arc;

use crate::core::{GridArea, LinearScale, SeriesColumns, SeriesKind, SeriesStyle};
use crate::error::{ChartError, ChartResult};

/// Series data as handed to the drawing layer for one frame: raw, sampled,
/// sliced to the visible window, or blended by a running transition.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSeries {
    pub index: usize,
    pub kind: SeriesKind,
    pub name: Option<String>,
    pub visible: bool,
    pub data: Arc<SeriesColumns>,
    pub style: SeriesStyle,
}

impl RenderSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `true` when the series has at least one point, candle or positive slice.
    #[must_use]
    pub fn has_drawable_mark(&self) -> bool {
        if !self.visible {
            return false;
        }
        match self.data.as_ref() {
            SeriesColumns::Pie(slices) => slices
                .iter()
                .any(|slice| slice.value.is_finite() && slice.value > 0.0),
            other => !other.is_empty(),
        }
    }
}

/// Resolved scales plus render series for one draw pass.
///
/// `x_scale` maps the visible x-domain onto `[0, grid.width]`, `y_scale` maps
/// the y-domain onto `[grid.height, 0]`. Hit-testing reads the same frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub grid_area: GridArea,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub x_base_domain: (f64, f64),
    pub x_visible_domain: (f64, f64),
    pub y_domain: (f64, f64),
    pub series: Vec<RenderSeries>,
    /// Eased intro progress in `[0, 1]`; 1 when no intro is running.
    pub intro_progress: f64,
}

impl RenderFrame {
    pub fn validate(&self) -> ChartResult<()> {
        self.grid_area.validate()?;
        if !(0.0..=1.0).contains(&self.intro_progress) {
            return Err(ChartError::Renderer(format!(
                "intro progress out of range: {}",
                self.intro_progress
            )));
        }
        for (domain, field) in [
            (self.x_base_domain, "x base domain"),
            (self.x_visible_domain, "x visible domain"),
            (self.y_domain, "y domain"),
        ] {
            if !domain.0.is_finite() || !domain.1.is_finite() {
                return Err(ChartError::Renderer(format!("{field} must be finite")));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn series(&self, index: usize) -> Option<&RenderSeries> {
        self.series.iter().find(|series| series.index == index)
    }

    #[must_use]
    pub fn visible_point_count(&self) -> usize {
        self.series
            .iter()
            .filter(|series| series.visible)
            .map(RenderSeries::len)
            .sum()
    }
}
