use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_millis, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// Plot area in device pixels. Render scales map into `[0, width] x [height, 0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl GridArea {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn validate(self) -> ChartResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ChartError::InvalidGridArea {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Returns `true` when a plot-local coordinate lies inside the area.
    #[must_use]
    pub fn contains_local(self, x: f64, y: f64) -> bool {
        x.is_finite() && y.is_finite() && x >= 0.0 && x <= self.width && y >= 0.0 && y <= self.height
    }
}

/// Point-series sample. `size` is tracked per index; absent stays `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub size: Option<f64>,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, size: None }
    }

    #[must_use]
    pub fn with_size(x: f64, y: f64, size: f64) -> Self {
        Self {
            x,
            y,
            size: Some(size),
        }
    }

    pub fn from_decimal_time(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Ok(Self::new(
            datetime_to_unix_millis(time),
            decimal_to_f64(value, "value")?,
        ))
    }
}

/// Candlestick record. `low`/`high` may arrive swapped; consumers use
/// [`OhlcRecord::low_bound`] and [`OhlcRecord::high_bound`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcRecord {
    pub timestamp: f64,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
}

impl OhlcRecord {
    #[must_use]
    pub fn new(timestamp: f64, open: f64, close: f64, low: f64, high: f64) -> Self {
        Self {
            timestamp,
            open,
            close,
            low,
            high,
        }
    }

    /// Converts strongly-typed temporal/decimal input into a record.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        close: Decimal,
        low: Decimal,
        high: Decimal,
    ) -> ChartResult<Self> {
        Ok(Self::new(
            datetime_to_unix_millis(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(high, "high")?,
        ))
    }

    #[must_use]
    pub fn low_bound(self) -> f64 {
        self.low.min(self.high)
    }

    #[must_use]
    pub fn high_bound(self) -> f64 {
        self.low.max(self.high)
    }

    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    #[serde(default)]
    pub name: String,
    pub value: f64,
}

impl PieSlice {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
    Area,
    Bar,
    Scatter,
    Pie,
    Candlestick,
}

impl SeriesKind {
    /// Cartesian series contribute to x/y bounds and accept streaming appends.
    #[must_use]
    pub fn is_cartesian(self) -> bool {
        !matches!(self, Self::Pie)
    }

    /// Series stored in x/y(/size) columns.
    #[must_use]
    pub fn is_point_series(self) -> bool {
        matches!(self, Self::Line | Self::Area | Self::Bar | Self::Scatter)
    }
}
