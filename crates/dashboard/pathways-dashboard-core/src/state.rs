//! Dashboard state and its pure reducer.
//!
//! The reducer never reads a clock. Hosts feed it the animator's segment
//! transitions and the wall time that passed between frames.

use log::{trace, warn};
use pathways_map_core::{AnimatorEvent, LegKind, Path};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;

const MS_PER_MINUTE: f64 = 60_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardAction {
    /// The vehicle started the segment beginning at `index`.
    SegmentEntered { index: usize },
    /// `elapsed_ms` of wall time passed.
    ClockAdvanced { elapsed_ms: f64 },
}

impl DashboardAction {
    /// The dashboard action matching an animator event, if there is one.
    pub fn from_event(event: &AnimatorEvent) -> Option<Self> {
        match event {
            AnimatorEvent::SegmentEntered { index, .. } => {
                Some(Self::SegmentEntered { index: *index })
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    pub segment_index: usize,
    pub leg: LegKind,
    pub status: String,
    /// Wall time spent on the current segment.
    pub segment_elapsed_ms: f64,
    /// Time until the next delivery leg begins; `None` if the path has none.
    pub eta_ms: Option<u64>,
    /// Kept fractional so per-frame deltas do not accumulate rounding.
    pub window_remaining_ms: f64,
    pub cost: f64,
    pub deliveries_completed: u32,
    /// Instruction feed, newest first.
    pub feed: Vec<String>,
}

impl DashboardState {
    /// State at the start of `path`, before any time has passed.
    pub fn initial(path: &Path, cfg: &DashboardConfig) -> Self {
        let leg = path.waypoints()[0].leg;
        let mut state = Self {
            segment_index: 0,
            leg,
            status: String::new(),
            segment_elapsed_ms: 0.0,
            eta_ms: path.remaining_ms_until(LegKind::Deliver, 0, 0.0),
            window_remaining_ms: cfg.delivery_window_ms as f64,
            cost: 0.0,
            deliveries_completed: 0,
            feed: Vec::new(),
        };
        state.status = status_text(leg, state.window_remaining_ms).to_string();
        if let Some(text) = cfg.instruction_for(0) {
            state.feed.push(text.to_string());
        }
        state
    }

    /// ETA as `m:ss`, or `--` when there is nothing to deliver.
    pub fn eta_text(&self) -> String {
        self.eta_ms.map_or_else(|| "--".to_string(), clock_text)
    }

    pub fn window_text(&self) -> String {
        clock_text(self.window_remaining_ms.round() as u64)
    }

    pub fn cost_text(&self) -> String {
        format!("${:.2}", self.cost)
    }
}

/// Human-readable status for a leg. An expired window overrides
/// everything except the hand-over itself.
pub fn status_text(leg: LegKind, window_remaining_ms: f64) -> &'static str {
    match leg {
        LegKind::Deliver => "Delivering package",
        _ if window_remaining_ms <= 0.0 => "Running late",
        LegKind::Drive => "En route",
        LegKind::Wait => "Waiting",
        LegKind::Walk => "On foot",
    }
}

/// Apply one action. `path` must be the path whose indices the actions
/// refer to.
pub fn reduce(
    mut state: DashboardState,
    action: DashboardAction,
    path: &Path,
    cfg: &DashboardConfig,
) -> DashboardState {
    match action {
        DashboardAction::SegmentEntered { index } => {
            let Some(wp) = path.get(index) else {
                warn!(
                    "segment {index} out of range for a {}-segment path; ignoring",
                    path.len()
                );
                return state;
            };
            if state.leg == LegKind::Deliver && wp.leg != LegKind::Deliver {
                state.deliveries_completed += 1;
                state.window_remaining_ms = cfg.delivery_window_ms as f64;
                trace!("delivery {} completed", state.deliveries_completed);
            }
            state.segment_index = index;
            state.leg = wp.leg;
            state.segment_elapsed_ms = 0.0;
            if let Some(text) = cfg.instruction_for(index) {
                state.feed.insert(0, text.to_string());
                state.feed.truncate(cfg.feed_capacity);
            }
        }
        DashboardAction::ClockAdvanced { elapsed_ms } => {
            if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
                return state;
            }
            state.segment_elapsed_ms += elapsed_ms;
            state.window_remaining_ms = (state.window_remaining_ms - elapsed_ms).max(0.0);
            if state.leg.is_driving() {
                state.cost += cfg.cost_per_minute * elapsed_ms / MS_PER_MINUTE;
            }
        }
    }

    let duration = path
        .get(state.segment_index)
        .map_or(1.0, |wp| wp.duration_ms as f64);
    let progress = (state.segment_elapsed_ms / duration).min(1.0);
    state.eta_ms = path.remaining_ms_until(LegKind::Deliver, state.segment_index, progress);
    state.status = status_text(state.leg, state.window_remaining_ms).to_string();
    state
}

fn clock_text(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
