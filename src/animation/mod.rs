//! Intro and update transitions.

mod easing;
mod transition;

pub use easing::Easing;
pub use transition::{
    AnimationConfig, ProgressTrack, TrackPhase, TrackTiming, TransitionController,
    TransitionSnapshot, TransitionStatus, interpolate_snapshot,
};
