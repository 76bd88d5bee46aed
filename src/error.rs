//! Error taxonomy for the analysis pipeline

use thiserror::Error;

/// Errors surfaced by the core analysis components.
///
/// Failures are isolated per group: a `Data` or `EmptyGraph` error aborts
/// the pipeline for the group that produced it and no other.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed or missing required field in the input roster
    #[error("data error: {message}")]
    Data {
        /// Description of the offending record and field
        message: String,
    },

    /// Metrics requested for a graph with zero nodes
    #[error("empty graph: group has no respondents")]
    EmptyGraph,
}

impl AnalysisError {
    /// Convenience constructor for data errors
    pub fn data(message: impl Into<String>) -> Self {
        Self::Data {
            message: message.into(),
        }
    }
}
