//! Mock metric constants for the driver dashboard.

use log::debug;
use pathways_map_core::Path;
use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Text pushed onto the feed when the vehicle enters `segment`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub segment: usize,
    pub text: String,
}

impl Instruction {
    pub fn new(segment: usize, text: impl Into<String>) -> Self {
        Self {
            segment,
            text: text.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Time promised to the customer for the current stop.
    pub delivery_window_ms: u64,
    /// Running cost while the vehicle drives, in currency units per minute.
    pub cost_per_minute: f64,
    /// Maximum number of feed entries kept.
    pub feed_capacity: usize,
    pub instructions: Vec<Instruction>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            delivery_window_ms: 20 * 60_000,
            cost_per_minute: 0.85,
            feed_capacity: 5,
            instructions: default_instructions(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, DashboardError> {
        let cfg: DashboardConfig = serde_json::from_str(json)?;
        debug!(
            "loaded dashboard config: window {} ms, {} instructions",
            cfg.delivery_window_ms,
            cfg.instructions.len()
        );
        Ok(cfg)
    }

    /// Check the constants and that every instruction targets a segment of `path`.
    pub fn validate(&self, path: &Path) -> Result<(), DashboardError> {
        if self.feed_capacity == 0 {
            return Err(DashboardError::EmptyFeed);
        }
        if !self.cost_per_minute.is_finite() || self.cost_per_minute < 0.0 {
            return Err(DashboardError::InvalidCostRate {
                value: self.cost_per_minute,
            });
        }
        if let Some(bad) = self.instructions.iter().find(|i| i.segment >= path.len()) {
            return Err(DashboardError::InstructionOutOfRange {
                segment: bad.segment,
                len: path.len(),
            });
        }
        Ok(())
    }

    /// First instruction keyed to `segment`, if any.
    pub fn instruction_for(&self, segment: usize) -> Option<&str> {
        self.instructions
            .iter()
            .find(|i| i.segment == segment)
            .map(|i| i.text.as_str())
    }
}

/// Feed script for the default delivery loop.
fn default_instructions() -> Vec<Instruction> {
    vec![
        Instruction::new(0, "Head east along the north road"),
        Instruction::new(2, "Hold for the loading bay gate"),
        Instruction::new(3, "Turn right and continue south"),
        Instruction::new(5, "Park at the curb"),
        Instruction::new(6, "Walk to the front door"),
        Instruction::new(7, "Hand over package: Large and Bulky"),
        Instruction::new(9, "Back in the vehicle, head west"),
        Instruction::new(11, "Turn right toward the depot"),
        Instruction::new(12, "Route complete, waiting for the next job"),
    ]
}
