//! Pointer resolution against the last rendered frame, plus the shared
//! interaction-x cursor used for synced crosshairs.

mod axis_trigger;
mod bar_hit;
mod candlestick_hit;
mod hit;
mod nearest_point;
mod pie_hit;

pub use axis_trigger::find_points_at_x;
pub use bar_hit::{BarLayout, BarRect, find_bar_at};
pub use candlestick_hit::find_candle_at;
pub use hit::{HitTestTuning, HitValue, SeriesHit};
pub use nearest_point::find_nearest_point;
pub use pie_hit::{PieShape, find_pie_slice_at};

use serde::{Deserialize, Serialize};

use crate::core::{ListenerId, ListenerSet};

/// Interaction-x notification. `source` identifies the originating chart or
/// component so sync consumers can drop their own echoes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionXChange {
    pub x: Option<f64>,
    pub source: Option<String>,
}

/// Shared crosshair x position in data space.
#[derive(Debug, Default)]
pub struct InteractionXState {
    x: Option<f64>,
    source: Option<String>,
    listeners: ListenerSet<InteractionXChange>,
}

impl InteractionXState {
    #[must_use]
    pub fn x(&self) -> Option<f64> {
        self.x
    }

    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Stores `x` and notifies only on an actual change. Non-finite values clear it.
    pub fn set(&mut self, x: Option<f64>, source: Option<String>) -> bool {
        let x = x.filter(|value| value.is_finite());
        if x == self.x {
            return false;
        }
        self.x = x;
        self.source = source.clone();
        self.listeners.emit(&InteractionXChange { x, source });
        true
    }

    pub fn subscribe(&self, callback: impl FnMut(&InteractionXChange) + 'static) -> ListenerId {
        self.listeners.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn clear_listeners(&self) {
        self.listeners.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn fires_only_on_change() {
        let mut state = InteractionXState::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.subscribe(move |change: &InteractionXChange| sink.borrow_mut().push(change.x));

        assert!(state.set(Some(3.0), None));
        assert!(!state.set(Some(3.0), Some("peer".to_owned())));
        assert!(state.set(Some(f64::NAN), None));
        assert_eq!(*seen.borrow(), vec![Some(3.0), None]);
    }
}
