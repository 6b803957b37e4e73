use serde::{Deserialize, Serialize};

use crate::core::sampling::SamplingStrategy;
use crate::core::series_store::SeriesData;
use crate::core::types::SeriesKind;

/// Length given either in pixels or as a percentage of a basis length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Px(f64),
    Percent(f64),
}

impl Dimension {
    /// Resolves against `basis`; non-finite results collapse to 0.
    #[must_use]
    pub fn resolve(self, basis: f64) -> f64 {
        let value = match self {
            Self::Px(px) => px,
            Self::Percent(percent) => basis * percent / 100.0,
        };
        if value.is_finite() { value } else { 0.0 }
    }
}

fn default_bar_gap() -> f64 {
    0.1
}

fn default_bar_category_gap() -> f64 {
    0.2
}

/// Grouped/stacked bar geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayoutOptions {
    /// Series sharing a non-empty stack id share one cluster slot.
    #[serde(default)]
    pub stack: Option<String>,
    #[serde(default)]
    pub bar_width: Option<Dimension>,
    /// Gap between bars of one category, as a fraction of one bar width.
    #[serde(default = "default_bar_gap")]
    pub bar_gap: f64,
    /// Gap between categories, as a fraction of the category width.
    #[serde(default = "default_bar_category_gap")]
    pub bar_category_gap: f64,
}

impl Default for BarLayoutOptions {
    fn default() -> Self {
        Self {
            stack: None,
            bar_width: None,
            bar_gap: default_bar_gap(),
            bar_category_gap: default_bar_category_gap(),
        }
    }
}

impl BarLayoutOptions {
    #[must_use]
    pub fn stack_id(&self) -> Option<&str> {
        self.stack.as_deref().filter(|id| !id.is_empty())
    }
}

fn default_body_width() -> Dimension {
    Dimension::Percent(80.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandlestickOptions {
    /// Body width; percentages resolve against the category width.
    #[serde(default = "default_body_width")]
    pub body_width: Dimension,
}

impl Default for CandlestickOptions {
    fn default() -> Self {
        Self {
            body_width: default_body_width(),
        }
    }
}

fn default_pie_center() -> (Dimension, Dimension) {
    (Dimension::Percent(50.0), Dimension::Percent(50.0))
}

fn default_inner_radius() -> Dimension {
    Dimension::Px(0.0)
}

fn default_outer_radius() -> Dimension {
    Dimension::Percent(75.0)
}

fn default_start_angle_deg() -> f64 {
    90.0
}

/// Pie placement. Center percentages resolve against the grid width/height,
/// radius percentages against half the shorter grid side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieGeometry {
    #[serde(default = "default_pie_center")]
    pub center: (Dimension, Dimension),
    #[serde(default = "default_inner_radius")]
    pub inner_radius: Dimension,
    #[serde(default = "default_outer_radius")]
    pub outer_radius: Dimension,
    /// Angle of the first slice edge, counter-clockwise from 3 o'clock.
    /// Slices advance clockwise.
    #[serde(default = "default_start_angle_deg")]
    pub start_angle_deg: f64,
}

impl Default for PieGeometry {
    fn default() -> Self {
        Self {
            center: default_pie_center(),
            inner_radius: default_inner_radius(),
            outer_radius: default_outer_radius(),
            start_angle_deg: default_start_angle_deg(),
        }
    }
}

/// Geometry carried from the resolved config into every render series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStyle {
    #[serde(default)]
    pub bar: BarLayoutOptions,
    /// Scatter marker radius in px; per-point sizes take precedence.
    #[serde(default)]
    pub symbol_size: Option<f64>,
    #[serde(default)]
    pub candlestick: CandlestickOptions,
    #[serde(default)]
    pub pie: PieGeometry,
}

fn default_visible() -> bool {
    true
}

fn default_sampling_threshold() -> usize {
    5_000
}

/// One normalized series record as produced by the config resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSeriesConfig {
    pub kind: SeriesKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    pub data: SeriesData,
    #[serde(default)]
    pub sampling: SamplingStrategy,
    /// Point budget at full span.
    #[serde(default = "default_sampling_threshold")]
    pub sampling_threshold: usize,
    #[serde(flatten)]
    pub style: SeriesStyle,
}

impl ResolvedSeriesConfig {
    #[must_use]
    pub fn new(kind: SeriesKind, data: SeriesData) -> Self {
        Self {
            kind,
            name: None,
            visible: true,
            data,
            sampling: SamplingStrategy::None,
            sampling_threshold: default_sampling_threshold(),
            style: SeriesStyle::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_sampling(mut self, strategy: SamplingStrategy, threshold: usize) -> Self {
        self.sampling = strategy;
        self.sampling_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.style.bar.stack = Some(stack.into());
        self
    }

    #[must_use]
    pub fn with_bar_width(mut self, width: Dimension) -> Self {
        self.style.bar.bar_width = Some(width);
        self
    }

    #[must_use]
    pub fn with_symbol_size(mut self, radius: f64) -> Self {
        self.style.symbol_size = Some(radius);
        self
    }

    #[must_use]
    pub fn with_pie_geometry(mut self, pie: PieGeometry) -> Self {
        self.style.pie = pie;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_id_is_unstacked() {
        let mut bar = BarLayoutOptions::default();
        bar.stack = Some(String::new());
        assert_eq!(bar.stack_id(), None);
        bar.stack = Some("total".to_owned());
        assert_eq!(bar.stack_id(), Some("total"));
    }

    #[test]
    fn series_config_deserializes_with_defaults() {
        let json = r#"{"kind":"scatter","data":{"type":"points","data":[{"x":1.0,"y":2.0}]},"symbol_size":6.0}"#;
        let config: ResolvedSeriesConfig = serde_json::from_str(json).expect("config");
        assert!(config.visible);
        assert_eq!(config.sampling, SamplingStrategy::None);
        assert_eq!(config.style.symbol_size, Some(6.0));
        assert_eq!(config.style.bar.bar_gap, 0.1);
    }
}
