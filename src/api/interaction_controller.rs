use crate::core::ListenerId;
use crate::host::FrameHost;
use crate::interaction::InteractionXChange;
use crate::render::Renderer;

use super::ChartCoordinator;

impl<R: Renderer, H: FrameHost> ChartCoordinator<R, H> {
    #[must_use]
    pub fn interaction_x(&self) -> Option<f64> {
        if self.core.runtime.disposed {
            return None;
        }
        self.core.model.interaction_x.x()
    }

    /// Moves the shared crosshair. `None` or a non-finite value clears it.
    /// Returns `true` when listeners were notified.
    pub fn set_interaction_x(&mut self, x: Option<f64>, source: Option<&str>) -> bool {
        if self.core.runtime.disposed {
            return false;
        }
        let changed = self
            .core
            .model
            .interaction_x
            .set(x, source.map(str::to_owned));
        if changed {
            self.core.runtime.needs_render = true;
        }
        changed
    }

    pub fn on_interaction_x_change(
        &mut self,
        callback: impl FnMut(&InteractionXChange) + 'static,
    ) -> Option<ListenerId> {
        if self.core.runtime.disposed {
            return None;
        }
        Some(self.core.model.interaction_x.subscribe(callback))
    }

    pub fn off_interaction_x_change(&mut self, id: ListenerId) -> bool {
        if self.core.runtime.disposed {
            return false;
        }
        self.core.model.interaction_x.unsubscribe(id)
    }
}
