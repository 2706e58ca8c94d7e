use pathways_map_core::MapError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("feed capacity must be at least 1")]
    EmptyFeed,

    #[error("invalid cost rate: {value} per minute")]
    InvalidCostRate { value: f64 },

    /// An instruction is keyed to a segment the path does not have.
    #[error("instruction for segment {segment} but path has {len} segments")]
    InstructionOutOfRange { segment: usize, len: usize },

    #[error("parse error: {reason}")]
    Parse { reason: String },

    #[error(transparent)]
    Map(#[from] MapError),
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}
