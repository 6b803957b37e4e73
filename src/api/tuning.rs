use serde::{Deserialize, Serialize};

use crate::core::SamplingTargetLimits;
use crate::error::{ChartError, ChartResult};
use crate::interaction::HitTestTuning;

fn default_buffer_fraction() -> f64 {
    0.1
}

fn default_max_sample_multiplier() -> f64 {
    32.0
}

fn default_absolute_sample_cap() -> usize {
    1_000_000
}

fn default_zoom_resample_debounce_ms() -> f64 {
    100.0
}

fn default_flush_fallback_ms() -> f64 {
    16.0
}

fn default_pinned_end_threshold() -> f64 {
    99.5
}

fn default_interpolation_cap() -> usize {
    20_000
}

fn default_scatter_radius_px() -> f64 {
    4.0
}

fn default_max_hit_distance_px() -> f64 {
    20.0
}

fn default_frame_drop_factor() -> f64 {
    1.5
}

/// Product-tuning constants of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorTuning {
    /// Fraction of the visible span added on each side before sampling.
    #[serde(default = "default_buffer_fraction")]
    pub buffer_fraction: f64,
    #[serde(default = "default_max_sample_multiplier")]
    pub max_sample_multiplier: f64,
    #[serde(default = "default_absolute_sample_cap")]
    pub absolute_sample_cap: usize,
    #[serde(default = "default_zoom_resample_debounce_ms")]
    pub zoom_resample_debounce_ms: f64,
    #[serde(default = "default_flush_fallback_ms")]
    pub flush_fallback_ms: f64,
    /// Zoom windows ending at or past this percent follow new data.
    #[serde(default = "default_pinned_end_threshold")]
    pub pinned_end_threshold: f64,
    #[serde(default = "default_interpolation_cap")]
    pub interpolation_cap: usize,
    #[serde(default = "default_scatter_radius_px")]
    pub default_scatter_radius_px: f64,
    #[serde(default = "default_max_hit_distance_px")]
    pub max_hit_distance_px: f64,
    /// Flush latency above `flush_fallback_ms * factor` is logged as a dropped frame.
    #[serde(default = "default_frame_drop_factor")]
    pub frame_drop_factor: f64,
}

impl Default for CoordinatorTuning {
    fn default() -> Self {
        Self {
            buffer_fraction: default_buffer_fraction(),
            max_sample_multiplier: default_max_sample_multiplier(),
            absolute_sample_cap: default_absolute_sample_cap(),
            zoom_resample_debounce_ms: default_zoom_resample_debounce_ms(),
            flush_fallback_ms: default_flush_fallback_ms(),
            pinned_end_threshold: default_pinned_end_threshold(),
            interpolation_cap: default_interpolation_cap(),
            default_scatter_radius_px: default_scatter_radius_px(),
            max_hit_distance_px: default_max_hit_distance_px(),
            frame_drop_factor: default_frame_drop_factor(),
        }
    }
}

impl CoordinatorTuning {
    #[must_use]
    pub fn with_buffer_fraction(mut self, fraction: f64) -> Self {
        self.buffer_fraction = fraction;
        self
    }

    #[must_use]
    pub fn with_zoom_resample_debounce_ms(mut self, delay_ms: f64) -> Self {
        self.zoom_resample_debounce_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_flush_fallback_ms(mut self, delay_ms: f64) -> Self {
        self.flush_fallback_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_interpolation_cap(mut self, cap: usize) -> Self {
        self.interpolation_cap = cap;
        self
    }

    #[must_use]
    pub fn with_max_hit_distance_px(mut self, distance: f64) -> Self {
        self.max_hit_distance_px = distance;
        self
    }

    pub(crate) fn validate(&self) -> ChartResult<()> {
        let non_negative = [
            ("buffer_fraction", self.buffer_fraction),
            ("zoom_resample_debounce_ms", self.zoom_resample_debounce_ms),
            ("flush_fallback_ms", self.flush_fallback_ms),
            ("default_scatter_radius_px", self.default_scatter_radius_px),
            ("max_hit_distance_px", self.max_hit_distance_px),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "{field} must be finite and >= 0"
                )));
            }
        }
        if !self.max_sample_multiplier.is_finite() || self.max_sample_multiplier < 1.0 {
            return Err(ChartError::InvalidData(
                "max_sample_multiplier must be finite and >= 1".to_owned(),
            ));
        }
        if !self.frame_drop_factor.is_finite() || self.frame_drop_factor < 1.0 {
            return Err(ChartError::InvalidData(
                "frame_drop_factor must be finite and >= 1".to_owned(),
            ));
        }
        if !self.pinned_end_threshold.is_finite() {
            return Err(ChartError::InvalidData(
                "pinned_end_threshold must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn sampling_limits(&self) -> SamplingTargetLimits {
        SamplingTargetLimits {
            max_multiplier: self.max_sample_multiplier,
            absolute_cap: self.absolute_sample_cap,
        }
    }

    #[must_use]
    pub fn hit_test(&self) -> HitTestTuning {
        HitTestTuning {
            max_distance_px: self.max_hit_distance_px,
            default_symbol_radius_px: self.default_scatter_radius_px,
        }
    }

    /// Serializes tuning to pretty JSON for debug/config files.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize tuning: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse tuning: {e}")))
    }
}
