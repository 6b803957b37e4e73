use crate::core::zoom::{ZOOM_PERCENT_MAX, ZoomRange};

/// Window to apply after data growth, or `None` to leave the window alone.
///
/// A window whose end sits at or past `pinned_threshold` keeps its span and is
/// re-pinned to 100 so the newest data stays in view. Any other window keeps
/// its absolute x-range (`previous_visible`) re-expressed in the new base.
#[must_use]
pub fn auto_scroll_window(
    previous: ZoomRange,
    previous_visible: (f64, f64),
    next_base: (f64, f64),
    pinned_threshold: f64,
) -> Option<ZoomRange> {
    let next_span = next_base.1 - next_base.0;
    if !next_span.is_finite() || next_span == 0.0 {
        return None;
    }

    if previous.end >= pinned_threshold {
        let span = previous.span();
        return Some(ZoomRange::new(ZOOM_PERCENT_MAX - span, ZOOM_PERCENT_MAX));
    }

    let start = (previous_visible.0 - next_base.0) / next_span * 100.0;
    let end = (previous_visible.1 - next_base.0) / next_span * 100.0;
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    Some(ZoomRange::new(start, end))
}

/// Minimum zoom span in percent that still shows about two samples of the
/// densest series.
#[must_use]
pub fn dataset_min_span(max_point_count: usize) -> f64 {
    if max_point_count < 2 {
        return 0.0;
    }
    (ZOOM_PERCENT_MAX / (max_point_count - 1) as f64).min(ZOOM_PERCENT_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_window_stays_pinned_with_same_span() {
        let next = auto_scroll_window(
            ZoomRange::new(80.0, 99.5),
            (80.0, 99.5),
            (0.0, 200.0),
            99.5,
        );
        assert_eq!(next, Some(ZoomRange::new(80.5, 100.0)));
    }

    #[test]
    fn panned_window_keeps_absolute_range() {
        let next = auto_scroll_window(
            ZoomRange::new(20.0, 40.0),
            (20.0, 40.0),
            (0.0, 200.0),
            99.5,
        );
        assert_eq!(next, Some(ZoomRange::new(10.0, 20.0)));
    }

    #[test]
    fn degenerate_base_skips_auto_scroll() {
        let previous = ZoomRange::new(20.0, 40.0);
        assert_eq!(auto_scroll_window(previous, (20.0, 40.0), (5.0, 5.0), 99.5), None);
        assert_eq!(
            auto_scroll_window(previous, (20.0, 40.0), (0.0, f64::INFINITY), 99.5),
            None
        );
    }

    #[test]
    fn dataset_min_span_tracks_density() {
        assert_eq!(dataset_min_span(0), 0.0);
        assert_eq!(dataset_min_span(1), 0.0);
        assert_eq!(dataset_min_span(2), 100.0);
        assert_eq!(dataset_min_span(101), 1.0);
    }
}
