use serde::{Deserialize, Serialize};

use crate::core::listeners::{ListenerId, ListenerSet};

pub const ZOOM_PERCENT_MIN: f64 = 0.0;
pub const ZOOM_PERCENT_MAX: f64 = 100.0;

/// Zoom window in percent space `[0, 100]` over the x base domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub start: f64,
    pub end: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::full()
    }
}

impl ZoomRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: ZOOM_PERCENT_MIN,
            end: ZOOM_PERCENT_MAX,
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_full_span(self) -> bool {
        self.start <= ZOOM_PERCENT_MIN && self.end >= ZOOM_PERCENT_MAX
    }

    /// Maps the window onto an absolute x-domain.
    #[must_use]
    pub fn to_domain(self, base: (f64, f64)) -> (f64, f64) {
        let span = base.1 - base.0;
        (
            base.0 + (self.start / 100.0) * span,
            base.0 + (self.end / 100.0) * span,
        )
    }
}

/// Origin of a zoom change, so synced charts can avoid echo loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZoomChangeSource {
    User,
    AutoScroll,
    Api,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomChange {
    pub range: ZoomRange,
    pub source: Option<ZoomChangeSource>,
}

/// Percent-space zoom window with span constraints and change notification.
///
/// Malformed input (non-finite values, zoom factors `<= 1`) is ignored rather
/// than rejected: these calls are fed by raw wheel and drag events.
#[derive(Debug)]
pub struct ZoomState {
    range: ZoomRange,
    min_span: f64,
    max_span: f64,
    listeners: ListenerSet<ZoomChange>,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::new(ZoomRange::full(), 0.0, 100.0)
    }
}

impl ZoomState {
    #[must_use]
    pub fn new(initial: ZoomRange, min_span: f64, max_span: f64) -> Self {
        let (min_span, max_span) = sanitize_span_constraints(min_span, max_span);
        let range = constrain(initial.start, initial.end, min_span, max_span)
            .unwrap_or_else(ZoomRange::full);
        Self {
            range,
            min_span,
            max_span,
            listeners: ListenerSet::new(),
        }
    }

    #[must_use]
    pub fn range(&self) -> ZoomRange {
        self.range
    }

    #[must_use]
    pub fn span_constraints(&self) -> (f64, f64) {
        (self.min_span, self.max_span)
    }

    pub fn subscribe(&self, callback: impl FnMut(&ZoomChange) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&self) {
        self.listeners.clear();
    }

    /// Clamps into `[0, 100]` and the span constraints; notifies only when the
    /// clamped window differs from the current one. Returns `true` on change.
    pub fn set_range(&mut self, start: f64, end: f64, source: Option<ZoomChangeSource>) -> bool {
        let Some(next) = constrain(start, end, self.min_span, self.max_span) else {
            return false;
        };
        self.apply(next, source)
    }

    /// Shifts the window; the span only changes when an edge clamp applies.
    pub fn pan(&mut self, delta_percent: f64, source: Option<ZoomChangeSource>) -> bool {
        if !delta_percent.is_finite() {
            return false;
        }
        let span = self.range.span();
        let mut start = self.range.start + delta_percent;
        let mut end = self.range.end + delta_percent;
        if start < ZOOM_PERCENT_MIN {
            start = ZOOM_PERCENT_MIN;
            end = start + span;
        }
        if end > ZOOM_PERCENT_MAX {
            end = ZOOM_PERCENT_MAX;
            start = end - span;
        }
        self.set_range(start, end, source)
    }

    pub fn zoom_in(&mut self, center: f64, factor: f64, source: Option<ZoomChangeSource>) -> bool {
        self.zoom_by(center, factor, true, source)
    }

    pub fn zoom_out(&mut self, center: f64, factor: f64, source: Option<ZoomChangeSource>) -> bool {
        self.zoom_by(center, factor, false, source)
    }

    /// Replaces span constraints and re-clamps the current window, notifying
    /// listeners if the window moved.
    pub fn set_span_constraints(
        &mut self,
        min_span: f64,
        max_span: f64,
        source: Option<ZoomChangeSource>,
    ) -> bool {
        if !min_span.is_finite() || !max_span.is_finite() {
            return false;
        }
        let (min_span, max_span) = sanitize_span_constraints(min_span, max_span);
        self.min_span = min_span;
        self.max_span = max_span;
        let current = self.range;
        self.set_range(current.start, current.end, source)
    }

    fn zoom_by(
        &mut self,
        center: f64,
        factor: f64,
        zoom_in: bool,
        source: Option<ZoomChangeSource>,
    ) -> bool {
        if !center.is_finite() || !factor.is_finite() || factor <= 1.0 {
            return false;
        }
        let ZoomRange { start, end } = self.range;
        let span = end - start;
        let ratio = if span > 0.0 {
            ((center - start) / span).clamp(0.0, 1.0)
        } else {
            0.5
        };
        let next_span = if zoom_in { span / factor } else { span * factor };
        let next_start = center - ratio * next_span;
        self.set_range(next_start, next_start + next_span, source)
    }

    fn apply(&mut self, next: ZoomRange, source: Option<ZoomChangeSource>) -> bool {
        if next == self.range {
            return false;
        }
        self.range = next;
        self.listeners.emit(&ZoomChange {
            range: next,
            source,
        });
        true
    }
}

fn sanitize_span_constraints(min_span: f64, max_span: f64) -> (f64, f64) {
    let min_span = if min_span.is_finite() {
        min_span.clamp(0.0, ZOOM_PERCENT_MAX)
    } else {
        0.0
    };
    let max_span = if max_span.is_finite() {
        max_span.clamp(0.0, ZOOM_PERCENT_MAX)
    } else {
        ZOOM_PERCENT_MAX
    };
    if min_span <= max_span {
        (min_span, max_span)
    } else {
        (max_span, min_span)
    }
}

/// Normalizes a requested window. `None` for non-finite input.
fn constrain(start: f64, end: f64, min_span: f64, max_span: f64) -> Option<ZoomRange> {
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let mut start = start.clamp(ZOOM_PERCENT_MIN, ZOOM_PERCENT_MAX);
    let mut end = end.clamp(ZOOM_PERCENT_MIN, ZOOM_PERCENT_MAX);

    let span = end - start;
    let target = span.clamp(min_span, max_span);
    if target != span {
        let center = (start + end) * 0.5;
        start = center - target * 0.5;
        end = center + target * 0.5;
        if start < ZOOM_PERCENT_MIN {
            end -= start;
            start = ZOOM_PERCENT_MIN;
        }
        if end > ZOOM_PERCENT_MAX {
            start -= end - ZOOM_PERCENT_MAX;
            end = ZOOM_PERCENT_MAX;
        }
        start = start.max(ZOOM_PERCENT_MIN);
    }
    Some(ZoomRange { start, end })
}
