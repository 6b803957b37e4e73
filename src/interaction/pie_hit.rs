use crate::core::{PieGeometry, PieSlice, SeriesKind};
use crate::render::RenderFrame;

use super::hit::{HitValue, SeriesHit};

/// Resolved pie placement in grid-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieShape {
    pub center: (f64, f64),
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle_deg: f64,
}

impl PieShape {
    #[must_use]
    pub fn resolve(geometry: PieGeometry, width: f64, height: f64) -> Self {
        let radius_basis = width.min(height) / 2.0;
        let inner = geometry.inner_radius.resolve(radius_basis).max(0.0);
        let outer = geometry.outer_radius.resolve(radius_basis).max(0.0);
        Self {
            center: (geometry.center.0.resolve(width), geometry.center.1.resolve(height)),
            inner_radius: inner.min(outer),
            outer_radius: inner.max(outer),
            start_angle_deg: geometry.start_angle_deg,
        }
    }

    /// Clockwise angle from the start edge to the pointer, in `[0, 360)`.
    fn sweep_to(&self, x: f64, y: f64) -> f64 {
        // Screen y grows downward; flip it for a counter-clockwise math angle.
        let pointer_deg = (-(y - self.center.1)).atan2(x - self.center.0).to_degrees();
        (self.start_angle_deg - pointer_deg).rem_euclid(360.0)
    }

    fn point_at(&self, sweep_deg: f64, radius: f64) -> (f64, f64) {
        let angle = (self.start_angle_deg - sweep_deg).to_radians();
        (
            self.center.0 + radius * angle.cos(),
            self.center.1 - radius * angle.sin(),
        )
    }
}

fn drawable_value(slice: &PieSlice) -> Option<f64> {
    (slice.value.is_finite() && slice.value > 0.0).then_some(slice.value)
}

/// Slice containing the pointer, testing series in reverse draw order.
/// Hidden series are skipped.
#[must_use]
pub fn find_pie_slice_at(frame: &RenderFrame, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
    if !frame.grid_area.contains_local(pointer_x, pointer_y) {
        return None;
    }

    for series in frame.series.iter().rev() {
        if series.kind != SeriesKind::Pie || !series.visible {
            continue;
        }
        let Some(slices) = series.data.as_pie() else {
            continue;
        };
        let shape = PieShape::resolve(
            series.style.pie,
            frame.grid_area.width,
            frame.grid_area.height,
        );
        let radius = (pointer_x - shape.center.0).hypot(pointer_y - shape.center.1);
        if radius < shape.inner_radius || radius > shape.outer_radius {
            continue;
        }
        let total: f64 = slices.iter().filter_map(drawable_value).sum();
        if total <= 0.0 {
            continue;
        }

        let sweep = shape.sweep_to(pointer_x, pointer_y);
        let mut accumulated = 0.0;
        for (data_index, slice) in slices.iter().enumerate() {
            let Some(value) = drawable_value(slice) else {
                continue;
            };
            let fraction = value / total;
            let span = fraction * 360.0;
            if sweep >= accumulated && sweep < accumulated + span {
                let anchor = shape.point_at(
                    accumulated + span / 2.0,
                    (shape.inner_radius + shape.outer_radius) / 2.0,
                );
                return Some(SeriesHit::new(
                    series,
                    data_index,
                    HitValue::Slice {
                        slice: slice.clone(),
                        fraction,
                    },
                    anchor,
                ));
            }
            accumulated += span;
        }
    }
    None
}
