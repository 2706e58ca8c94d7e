//! Owning wrapper that keeps a path, its config, and the current state together.

use log::debug;
use pathways_map_core::{AnimatorEvent, Path};

use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::state::{reduce, DashboardAction, DashboardState};

#[derive(Clone, Debug)]
pub struct Dashboard {
    path: Path,
    cfg: DashboardConfig,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(path: Path, cfg: DashboardConfig) -> Result<Self, DashboardError> {
        cfg.validate(&path)?;
        let state = DashboardState::initial(&path, &cfg);
        debug!("dashboard ready for a {}-segment path", path.len());
        Ok(Self { path, cfg, state })
    }

    #[inline]
    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    #[inline]
    pub fn config(&self) -> &DashboardConfig {
        &self.cfg
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dispatch(&mut self, action: DashboardAction) -> &DashboardState {
        self.state = reduce(self.state.clone(), action, &self.path, &self.cfg);
        &self.state
    }

    /// Advance the clock by `elapsed_ms`, then apply the segment changes the
    /// animator reported for the same frame.
    pub fn observe(&mut self, elapsed_ms: f64, events: &[AnimatorEvent]) -> &DashboardState {
        self.dispatch(DashboardAction::ClockAdvanced { elapsed_ms });
        for action in events.iter().filter_map(DashboardAction::from_event) {
            self.dispatch(action);
        }
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = DashboardState::initial(&self.path, &self.cfg);
    }
}
