//! Discrete signals recorded by the animator during a tick.
//!
//! Hosts read them after `tick` to drive status text and the mock dashboard;
//! they are cleared at the start of the next tick.

use serde::{Deserialize, Serialize};

use crate::animator::{AnimationState, PathAnimator};
use crate::geometry::Point;
use crate::path::LegKind;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimatorEvent {
    /// The animator moved onto the segment starting at `index`.
    SegmentEntered { index: usize, leg: LegKind },
    /// Segment index wrapped back to 0; `loops` counts completed cycles.
    LoopCompleted { loops: u64 },
}

/// What a frame listener sees after a tick. Owned, so the listener may
/// call back into the loop that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub state: AnimationState,
    pub position: Point,
    pub leg: LegKind,
    pub loops: u64,
    pub events: Vec<AnimatorEvent>,
}

impl FrameSnapshot {
    pub fn of(animator: &PathAnimator) -> Self {
        Self {
            state: animator.state(),
            position: animator.current_position(),
            leg: animator.current_leg(),
            loops: animator.loops_completed(),
            events: animator.events().to_vec(),
        }
    }

    #[inline]
    pub fn segment_index(&self) -> usize {
        self.state.segment_index
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.state.progress
    }
}
