use super::{CoordinatorTuning, chart_model::ChartModel, chart_runtime::ChartRuntimeState};

/// Internal coordinator state used by the public facade (`ChartCoordinator`).
pub(super) struct EngineCore {
    pub(super) tuning: CoordinatorTuning,
    pub(super) model: ChartModel,
    pub(super) runtime: ChartRuntimeState,
}
