use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::core::{GridArea, ResolvedSeriesConfig};
use crate::error::{ChartError, ChartResult};

/// Explicit axis limits. Either bound overrides the data-derived one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisOverrides {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl AxisOverrides {
    #[must_use]
    pub fn is_unset(self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[must_use]
    pub fn apply(self, data_domain: (f64, f64)) -> (f64, f64) {
        (
            self.min.filter(|v| v.is_finite()).unwrap_or(data_domain.0),
            self.max.filter(|v| v.is_finite()).unwrap_or(data_domain.1),
        )
    }
}

fn default_zoom_start() -> f64 {
    0.0
}

fn default_zoom_end() -> f64 {
    100.0
}

fn default_max_span() -> f64 {
    100.0
}

/// Zoom window configuration. Its presence enables zoom and auto-scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataZoomOptions {
    #[serde(default = "default_zoom_start")]
    pub start: f64,
    #[serde(default = "default_zoom_end")]
    pub end: f64,
    #[serde(default)]
    pub min_span: f64,
    #[serde(default = "default_max_span")]
    pub max_span: f64,
}

impl Default for DataZoomOptions {
    fn default() -> Self {
        Self {
            start: default_zoom_start(),
            end: default_zoom_end(),
            min_span: 0.0,
            max_span: default_max_span(),
        }
    }
}

impl DataZoomOptions {
    #[must_use]
    pub fn window(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            ..Self::default()
        }
    }
}

/// Normalized chart options as produced by the config resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    pub grid_area: GridArea,
    #[serde(default)]
    pub series: Vec<ResolvedSeriesConfig>,
    #[serde(default)]
    pub x_axis: AxisOverrides,
    #[serde(default)]
    pub y_axis: AxisOverrides,
    #[serde(default)]
    pub data_zoom: Option<DataZoomOptions>,
    #[serde(default)]
    pub animation: AnimationConfig,
}

impl ResolvedOptions {
    #[must_use]
    pub fn new(grid_area: GridArea) -> Self {
        Self {
            grid_area,
            series: Vec::new(),
            x_axis: AxisOverrides::default(),
            y_axis: AxisOverrides::default(),
            data_zoom: None,
            animation: AnimationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_series(mut self, series: ResolvedSeriesConfig) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_x_axis(mut self, axis: AxisOverrides) -> Self {
        self.x_axis = axis;
        self
    }

    #[must_use]
    pub fn with_y_axis(mut self, axis: AxisOverrides) -> Self {
        self.y_axis = axis;
        self
    }

    #[must_use]
    pub fn with_data_zoom(mut self, zoom: DataZoomOptions) -> Self {
        self.data_zoom = Some(zoom);
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize options: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse options: {e}")))
    }
}
