//! Path animator: advances `(segment_index, progress)` along a cyclic path
//! from display-frame timestamps and interpolates the vehicle position.

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::outputs::AnimatorEvent;
use crate::path::{LegKind, Path};

/// Position along the path: the segment being traversed and the fraction
/// of its duration already elapsed. `progress` is always in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub segment_index: usize,
    pub progress: f64,
}

/// What a tick does when elapsed time runs past the end of a segment.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    /// Cross at most one boundary per tick and drop the leftover time.
    /// Long frame gaps show up as lag, never as skipped segments.
    #[default]
    SingleBoundary,
    /// Carry leftover time into following segments, crossing as many
    /// boundaries as it covers (at most one full cycle per tick).
    CatchUp,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    #[serde(default)]
    pub advance: AdvancePolicy,
}

#[derive(Debug, Clone)]
pub struct PathAnimator {
    path: Path,
    cfg: AnimatorConfig,
    state: AnimationState,
    last_timestamp: Option<f64>,
    loops: u64,
    events: Vec<AnimatorEvent>,
}

impl PathAnimator {
    pub fn new(path: Path) -> Self {
        Self::with_config(path, AnimatorConfig::default())
    }

    pub fn with_config(path: Path, cfg: AnimatorConfig) -> Self {
        Self {
            path,
            cfg,
            state: AnimationState::default(),
            last_timestamp: None,
            loops: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn config(&self) -> AnimatorConfig {
        self.cfg
    }

    #[inline]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    #[inline]
    pub fn segment_index(&self) -> usize {
        self.state.segment_index
    }

    #[inline]
    pub fn progress(&self) -> f64 {
        self.state.progress
    }

    /// Leg kind of the segment currently being traversed.
    #[inline]
    pub fn current_leg(&self) -> LegKind {
        self.path.waypoints()[self.state.segment_index].leg
    }

    /// Number of full cycles completed since construction or the last reset.
    #[inline]
    pub fn loops_completed(&self) -> u64 {
        self.loops
    }

    /// Timestamp of the previous tick, `None` before the first one.
    #[inline]
    pub fn last_timestamp(&self) -> Option<f64> {
        self.last_timestamp
    }

    /// Events recorded by the most recent tick.
    #[inline]
    pub fn events(&self) -> &[AnimatorEvent] {
        &self.events
    }

    /// Back to `{0, 0}` with no previous timestamp.
    pub fn reset(&mut self) {
        self.state = AnimationState::default();
        self.last_timestamp = None;
        self.loops = 0;
        self.events.clear();
    }

    /// Forget the previous timestamp so the next tick counts as a first
    /// tick. Position is kept. Used when a stopped loop is started again.
    pub fn forget_timestamp(&mut self) {
        self.last_timestamp = None;
    }

    /// Interpolated position on the current segment.
    pub fn current_position(&self) -> Point {
        let (start, end, _) = self.path.segment(self.state.segment_index);
        start.lerp(end, self.state.progress)
    }

    /// Advance the clock to `now` (milliseconds, monotonic).
    ///
    /// The first tick only records the timestamp. A timestamp earlier than
    /// the previous one counts as zero elapsed time.
    pub fn tick(&mut self, now: f64) -> &[AnimatorEvent] {
        self.events.clear();
        if !now.is_finite() {
            warn!("ignoring non-finite frame timestamp {now}");
            return &self.events;
        }

        let delta = match self.last_timestamp {
            None => 0.0,
            Some(prev) if now < prev => {
                warn!("frame timestamp went backwards ({prev} -> {now}); treating as zero delta");
                0.0
            }
            Some(prev) => now - prev,
        };
        self.last_timestamp = Some(now);

        let duration = self.current_duration();
        self.state.progress += delta / duration;

        match self.cfg.advance {
            AdvancePolicy::SingleBoundary => {
                if self.state.progress >= 1.0 {
                    self.enter_next_segment(now);
                    self.state.progress = 0.0;
                }
            }
            AdvancePolicy::CatchUp => self.catch_up(now),
        }
        &self.events
    }

    fn catch_up(&mut self, now: f64) {
        let mut budget = self.path.len();
        while self.state.progress >= 1.0 {
            if budget == 0 {
                trace!("catch-up budget spent; dropping leftover frame time");
                self.state.progress = 0.0;
                break;
            }
            budget -= 1;
            let leftover_ms = (self.state.progress - 1.0) * self.current_duration();
            self.enter_next_segment(now);
            self.state.progress = leftover_ms / self.current_duration();
        }
    }

    fn enter_next_segment(&mut self, now: f64) {
        let next = self.path.next_index(self.state.segment_index);
        self.state.segment_index = next;
        let leg = self.current_leg();
        trace!("entered segment {next} ({})", leg.name());
        self.events
            .push(AnimatorEvent::SegmentEntered { index: next, leg });
        if next == 0 {
            // Re-anchor the clock at the loop boundary.
            self.last_timestamp = Some(now);
            self.loops += 1;
            self.events
                .push(AnimatorEvent::LoopCompleted { loops: self.loops });
        }
    }

    #[inline]
    fn current_duration(&self) -> f64 {
        self.path.waypoints()[self.state.segment_index].duration_ms as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Waypoint;

    fn two_point_path() -> Path {
        Path::new(vec![
            Waypoint::new(Point::new(0.0, 0.0), 100),
            Waypoint::new(Point::new(10.0, 0.0), 100),
        ])
        .unwrap()
    }

    #[test]
    fn backwards_timestamp_is_zero_delta() {
        let mut anim = PathAnimator::new(two_point_path());
        anim.tick(1000.0);
        anim.tick(1050.0);
        let before = anim.state();
        anim.tick(900.0);
        assert_eq!(anim.state(), before);
        assert_eq!(anim.last_timestamp(), Some(900.0));
    }

    #[test]
    fn non_finite_timestamp_is_ignored() {
        let mut anim = PathAnimator::new(two_point_path());
        anim.tick(10.0);
        anim.tick(f64::NAN);
        assert_eq!(anim.last_timestamp(), Some(10.0));
        assert_eq!(anim.progress(), 0.0);
    }

    #[test]
    fn reset_clears_clock_and_loops() {
        let mut anim = PathAnimator::new(two_point_path());
        anim.tick(0.0);
        anim.tick(100.0);
        anim.tick(200.0);
        assert_eq!(anim.loops_completed(), 1);
        anim.reset();
        assert_eq!(anim.state(), AnimationState::default());
        assert_eq!(anim.last_timestamp(), None);
        assert_eq!(anim.loops_completed(), 0);
    }
}
