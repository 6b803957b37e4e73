use crate::core::SeriesKind;
use crate::render::RenderFrame;

use super::bar_hit::BarRect;
use super::hit::{HitValue, SeriesHit, candidate_range, category_width_px};

const MIN_BODY_HEIGHT_PX: f64 = 1.0;

/// Candle whose open/close body contains the pointer. Wicks are not targets.
///
/// Later series draw on top and win overlaps.
#[must_use]
pub fn find_candle_at(frame: &RenderFrame, pointer_x: f64, pointer_y: f64) -> Option<SeriesHit> {
    if !frame.grid_area.contains_local(pointer_x, pointer_y) {
        return None;
    }

    for series in frame.series.iter().rev() {
        if series.kind != SeriesKind::Candlestick || !series.visible {
            continue;
        }
        let Some(candles) = series.data.as_ohlc() else {
            continue;
        };
        let category = category_width_px(
            candles.timestamps(),
            frame.x_scale,
            frame.grid_area.width,
        );
        let body_width = series.style.candlestick.body_width.resolve(category).max(0.0);
        let half = body_width / 2.0;

        let candidates = candidate_range(
            candles.timestamps(),
            candles.has_non_finite_timestamp(),
            frame.x_scale,
            pointer_x - half,
            pointer_x + half,
        );
        // Later candles in one series draw over earlier ones.
        for data_index in candidates.rev() {
            let Some(record) = candles.record(data_index) else {
                continue;
            };
            if !record.timestamp.is_finite() || !record.open.is_finite() || !record.close.is_finite()
            {
                continue;
            }
            let center_x = frame.x_scale.scale(record.timestamp);
            let open_px = frame.y_scale.scale(record.open);
            let close_px = frame.y_scale.scale(record.close);
            let mut top = open_px.min(close_px);
            let mut bottom = open_px.max(close_px);
            if bottom - top < MIN_BODY_HEIGHT_PX {
                let middle = (top + bottom) / 2.0;
                top = middle - MIN_BODY_HEIGHT_PX / 2.0;
                bottom = middle + MIN_BODY_HEIGHT_PX / 2.0;
            }
            let body = BarRect {
                left: center_x - half,
                right: center_x + half,
                top,
                bottom,
            };
            if body.contains(pointer_x, pointer_y) {
                return Some(SeriesHit::new(
                    series,
                    data_index,
                    HitValue::Candle(record),
                    body.center(),
                ));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::{GridArea, LinearScale, OhlcColumns, OhlcRecord, SeriesColumns, SeriesStyle};
    use crate::render::RenderSeries;

    fn frame(records: &[OhlcRecord]) -> RenderFrame {
        RenderFrame {
            grid_area: GridArea::new(0.0, 0.0, 100.0, 100.0),
            x_scale: LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("x scale"),
            y_scale: LinearScale::new((0.0, 100.0), (100.0, 0.0)).expect("y scale"),
            x_base_domain: (0.0, 10.0),
            x_visible_domain: (0.0, 10.0),
            y_domain: (0.0, 100.0),
            series: vec![RenderSeries {
                index: 0,
                kind: SeriesKind::Candlestick,
                name: None,
                visible: true,
                data: Arc::new(SeriesColumns::Ohlc(OhlcColumns::from_records(records))),
                style: SeriesStyle::default(),
            }],
            intro_progress: 1.0,
        }
    }

    #[test]
    fn only_the_body_is_a_hit_target() {
        let frame = frame(&[
            OhlcRecord::new(4.0, 40.0, 60.0, 10.0, 90.0),
            OhlcRecord::new(6.0, 50.0, 55.0, 45.0, 70.0),
        ]);
        let hit = find_candle_at(&frame, 40.0, 50.0).expect("body hit");
        assert_eq!(hit.data_index, 0);
        // Inside the wick span but above the body.
        assert!(find_candle_at(&frame, 40.0, 15.0).is_none());
    }

    #[test]
    fn flat_body_keeps_minimum_height() {
        let frame = frame(&[OhlcRecord::new(5.0, 50.0, 50.0, 40.0, 60.0)]);
        assert!(find_candle_at(&frame, 50.0, 50.2).is_some());
    }
}
