use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::windowing::visible_index_range;
use crate::core::{PointColumns, SeriesKind};
use crate::render::{RenderFrame, RenderSeries};

use super::hit::{HitValue, SeriesHit, candidate_range, category_width_px};

/// Pixel rectangle of one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl BarRect {
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    #[must_use]
    pub fn contains_x(self, x: f64) -> bool {
        x >= self.left && x <= self.right
    }

    #[must_use]
    pub fn center(self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct BarSlot {
    frame_position: usize,
    slot: usize,
    stack: Option<String>,
}

/// Grouped/stacked layout of every visible bar series in a frame, mirroring
/// the drawing layer's cluster geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct BarLayout {
    pub category_width: f64,
    pub bar_width: f64,
    pub gap_px: f64,
    pub slot_count: usize,
    slots: Vec<BarSlot>,
}

/// Rounded x used to bucket stacked values; avoids float equality.
fn stack_key(x: f64) -> i64 {
    (x * 1e6).round() as i64
}

impl BarLayout {
    #[must_use]
    pub fn compute(frame: &RenderFrame) -> Option<Self> {
        let mut slots = Vec::new();
        let mut stack_slots: IndexMap<String, usize> = IndexMap::new();
        let mut slot_count = 0;
        let mut category_width = f64::INFINITY;
        let mut first: Option<&RenderSeries> = None;
        let mut explicit_width = None;

        for (position, series) in frame.series.iter().enumerate() {
            if series.kind != SeriesKind::Bar || !series.visible {
                continue;
            }
            let Some(columns) = series.data.as_points() else {
                continue;
            };
            first.get_or_insert(series);
            if explicit_width.is_none() {
                explicit_width = series.style.bar.bar_width;
            }

            category_width = category_width.min(category_width_px(
                columns.x(),
                frame.x_scale,
                f64::INFINITY,
            ));

            let stack = series.style.bar.stack_id().map(str::to_owned);
            let slot = match &stack {
                Some(id) => *stack_slots.entry(id.clone()).or_insert_with(|| {
                    slot_count += 1;
                    slot_count - 1
                }),
                None => {
                    slot_count += 1;
                    slot_count - 1
                }
            };
            slots.push(BarSlot {
                frame_position: position,
                slot,
                stack,
            });
        }

        let first = first?;
        if !category_width.is_finite() {
            category_width = frame.grid_area.width;
        }

        let bar_gap = first.style.bar.bar_gap.max(0.0);
        let category_gap = first.style.bar.bar_category_gap.clamp(0.0, 1.0);
        let slots_f = slot_count as f64;
        let bar_width = match explicit_width {
            Some(width) => width.resolve(category_width).max(0.0),
            None => {
                let inner = category_width * (1.0 - category_gap);
                inner / (slots_f + bar_gap * (slots_f - 1.0).max(0.0))
            }
        };

        Some(Self {
            category_width,
            bar_width,
            gap_px: bar_width * bar_gap,
            slot_count,
            slots,
        })
    }

    fn cluster_width(&self) -> f64 {
        let slots = self.slot_count as f64;
        slots * self.bar_width + (slots - 1.0).max(0.0) * self.gap_px
    }

    /// Left edge of `slot` relative to the category center.
    fn slot_offset(&self, slot: usize) -> f64 {
        -self.cluster_width() / 2.0 + slot as f64 * (self.bar_width + self.gap_px)
    }

    fn slot_for(&self, frame_position: usize) -> Option<&BarSlot> {
        self.slots
            .iter()
            .find(|slot| slot.frame_position == frame_position)
    }

    /// Value of stacked series drawn below `frame_position` at the same x-key
    /// and sign.
    fn stack_base(&self, frame: &RenderFrame, frame_position: usize, x: f64, value: f64) -> f64 {
        let Some(stack) = self
            .slot_for(frame_position)
            .and_then(|slot| slot.stack.as_deref())
        else {
            return 0.0;
        };
        let key = stack_key(x);
        let positive = value >= 0.0;
        let mut base = 0.0;
        for slot in &self.slots {
            if slot.frame_position >= frame_position || slot.stack.as_deref() != Some(stack) {
                continue;
            }
            let Some(columns) = frame.series[slot.frame_position].data.as_points() else {
                continue;
            };
            for index in same_key_indices(columns, x) {
                let below = columns.y()[index];
                if stack_key(columns.x()[index]) == key
                    && below.is_finite()
                    && (below >= 0.0) == positive
                {
                    base += below;
                }
            }
        }
        base
    }

    /// Rectangle of bar `data_index` in the series at `frame_position`.
    #[must_use]
    pub fn rect(&self, frame: &RenderFrame, frame_position: usize, data_index: usize) -> Option<BarRect> {
        let slot = self.slot_for(frame_position)?;
        let columns = frame.series.get(frame_position)?.data.as_points()?;
        let (x, y) = (*columns.x().get(data_index)?, *columns.y().get(data_index)?);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let base = self.stack_base(frame, frame_position, x, y);
        let left = frame.x_scale.scale(x) + self.slot_offset(slot.slot);
        let y_base = frame.y_scale.scale(base);
        let y_top = frame.y_scale.scale(base + y);
        Some(BarRect {
            left,
            right: left + self.bar_width,
            top: y_base.min(y_top),
            bottom: y_base.max(y_top),
        })
    }

    /// Data indices whose bar may span pixel column `pointer_x`.
    fn candidates(&self, frame: &RenderFrame, frame_position: usize, pointer_x: f64) -> std::ops::Range<usize> {
        let Some(slot) = self.slot_for(frame_position) else {
            return 0..0;
        };
        let Some(columns) = frame.series[frame_position].data.as_points() else {
            return 0..0;
        };
        let offset = self.slot_offset(slot.slot);
        candidate_range(
            columns.x(),
            columns.has_non_finite_x(),
            frame.x_scale,
            pointer_x - offset - self.bar_width,
            pointer_x - offset,
        )
    }
}

fn same_key_indices(columns: &PointColumns, x: f64) -> std::ops::Range<usize> {
    if columns.has_non_finite_x() {
        return 0..columns.len();
    }
    visible_index_range(columns.x(), x - 1e-6, x + 1e-6)
}

/// Bar whose rectangle contains the pointer.
///
/// Overlapping rectangles resolve to the visually topmost one (smallest top
/// pixel); equal tops favor the higher series index.
#[must_use]
pub fn find_bar_at(frame: &RenderFrame, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
    if !frame.grid_area.contains_local(pointer_x, pointer_y) {
        return None;
    }
    let layout = BarLayout::compute(frame)?;

    let mut hits: SmallVec<[(OrderedFloat<f64>, usize, usize, BarRect); 4]> = SmallVec::new();
    for slot in &layout.slots {
        for data_index in layout.candidates(frame, slot.frame_position, pointer_x) {
            if let Some(rect) = layout.rect(frame, slot.frame_position, data_index) {
                if rect.contains(pointer_x, pointer_y) {
                    hits.push((OrderedFloat(rect.top), slot.frame_position, data_index, rect));
                }
            }
        }
    }

    let (_, position, data_index, rect) = hits
        .into_iter()
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))?;
    bar_hit(frame, position, data_index, rect)
}

/// Bar whose horizontal extent contains `pointer_x` in one series, ignoring y.
pub(crate) fn bar_interval_hit(
    frame: &RenderFrame,
    layout: &BarLayout,
    frame_position: usize,
    pointer_x: f64,
) -> Option<SeriesHit> {
    layout
        .candidates(frame, frame_position, pointer_x)
        .find_map(|data_index| {
            let rect = layout.rect(frame, frame_position, data_index)?;
            rect.contains_x(pointer_x)
                .then(|| bar_hit(frame, frame_position, data_index, rect))
                .flatten()
        })
}

fn bar_hit(frame: &RenderFrame, position: usize, data_index: usize, rect: BarRect) -> Option<SeriesHit> {
    let series = frame.series.get(position)?;
    let point = series.data.as_points()?.point(data_index)?;
    Some(SeriesHit::new(
        series,
        data_index,
        HitValue::Point(point),
        rect.center(),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{
        DataPoint, Dimension, GridArea, LinearScale, SeriesColumns, SeriesStyle,
    };

    fn bar(index: usize, points: &[DataPoint], stack: Option<&str>) -> RenderSeries {
        let mut style = SeriesStyle::default();
        style.bar.stack = stack.map(str::to_owned);
        RenderSeries {
            index,
            kind: SeriesKind::Bar,
            name: None,
            visible: true,
            data: Arc::new(SeriesColumns::Points(PointColumns::from_points(points))),
            style,
        }
    }

    fn frame(series: Vec<RenderSeries>) -> RenderFrame {
        RenderFrame {
            grid_area: GridArea::new(0.0, 0.0, 100.0, 100.0),
            x_scale: LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("x scale"),
            y_scale: LinearScale::new((0.0, 10.0), (100.0, 0.0)).expect("y scale"),
            x_base_domain: (0.0, 10.0),
            x_visible_domain: (0.0, 10.0),
            y_domain: (0.0, 10.0),
            series,
            intro_progress: 1.0,
        }
    }

    #[test]
    fn stacked_series_share_one_slot_and_stack_upwards() {
        let lower = bar(0, &[DataPoint::new(5.0, 2.0)], Some("total"));
        let upper = bar(1, &[DataPoint::new(5.0, 3.0)], Some("total"));
        let frame = frame(vec![lower, upper]);
        let layout = BarLayout::compute(&frame).expect("layout");
        assert_eq!(layout.slot_count, 1);

        let rect = layout.rect(&frame, 1, 0).expect("rect");
        assert!((rect.bottom - 80.0).abs() < 1e-9);
        assert!((rect.top - 50.0).abs() < 1e-9);

        let hit = find_bar_at(&frame, 50.0, 60.0).expect("upper bar");
        assert_eq!(hit.series_index, 1);
        let hit = find_bar_at(&frame, 50.0, 90.0).expect("lower bar");
        assert_eq!(hit.series_index, 0);
    }

    #[test]
    fn pointer_outside_every_rect_misses() {
        let mut single = bar(0, &[DataPoint::new(5.0, 2.0)], None);
        single.style.bar.bar_width = Some(Dimension::Px(10.0));
        let frame = frame(vec![single]);
        assert!(find_bar_at(&frame, 50.0, 70.0).is_none());
        assert!(find_bar_at(&frame, 70.0, 90.0).is_none());
        assert!(find_bar_at(&frame, 52.0, 90.0).is_some());
    }
}
