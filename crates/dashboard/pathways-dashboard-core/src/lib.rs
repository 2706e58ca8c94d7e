//! Driver dashboard metrics
//!
//! Mock telemetry (status, ETA to the door, delivery window, running cost,
//! instruction feed) derived from the path animator's segment index through
//! an explicit reducer.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod state;

pub use config::{DashboardConfig, Instruction};
pub use dashboard::Dashboard;
pub use error::DashboardError;
pub use state::{reduce, status_text, DashboardAction, DashboardState};

pub type Result<T> = core::result::Result<T, DashboardError>;
