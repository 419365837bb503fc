//! Error types for stagepipe.
//!
//! Each failure kind is its own struct so callers can match on the precise
//! condition; [`PipelineError`] wraps all of them for `?` propagation.

use crate::core::StageName;
use crate::history::UndoTarget;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// The main error type for pipeline operations.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// A scalar extraction found no element.
    #[error("{0}")]
    EmptyStage(#[from] EmptyStageError),

    /// An undo target was never captured.
    #[error("{0}")]
    EmptyHistory(#[from] EmptyHistoryError),

    /// The wrapper could not accept the sink contents.
    #[error("{0}")]
    IncompatibleWrap(#[from] IncompatibleWrapError),

    /// A chain operation needed a tapped operation and none was installed.
    #[error("Operation '{chain}' requires a tapped operation, but none is installed")]
    MissingOperation {
        /// The chain operation that was called.
        chain: String,
    },

    /// Invalid configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Creates a missing-operation error.
    #[must_use]
    pub fn missing_operation(chain: impl Into<String>) -> Self {
        Self::MissingOperation {
            chain: chain.into(),
        }
    }

    /// Returns a stable error code for diagnostics.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyStage(_) => "STAGE-EMPTY",
            Self::EmptyHistory(_) => "HISTORY-EMPTY",
            Self::IncompatibleWrap(_) => "WRAP-INCOMPATIBLE",
            Self::MissingOperation { .. } => "OPERATION-MISSING",
            Self::Config(_) => "CONFIG-INVALID",
        }
    }
}

/// Error raised when a scalar extraction asks for an element that is not there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Stage '{stage}' has no element at index {index} (length {len})")]
pub struct EmptyStageError {
    /// The stage that was read.
    pub stage: StageName,
    /// The requested index.
    pub index: usize,
    /// How many items the stage held.
    pub len: usize,
}

impl EmptyStageError {
    /// Creates a new empty stage error.
    #[must_use]
    pub const fn new(stage: StageName, index: usize, len: usize) -> Self {
        Self { stage, index, len }
    }
}

/// Error raised when an undo target has no snapshot behind it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No snapshot available for {target} (history holds {available})")]
pub struct EmptyHistoryError {
    /// The requested target.
    pub target: UndoTarget,
    /// Number of snapshots in the bounded history at the time.
    pub available: usize,
}

impl EmptyHistoryError {
    /// Creates a new empty history error.
    #[must_use]
    pub const fn new(target: UndoTarget, available: usize) -> Self {
        Self { target, available }
    }
}

/// Error raised when a wrapper rejects the sink contents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Wrapper '{wrapper}' cannot accept sink contents: {reason}")]
pub struct IncompatibleWrapError {
    /// The wrapper name.
    pub wrapper: String,
    /// Why the contents were rejected.
    pub reason: String,
}

impl IncompatibleWrapError {
    /// Creates a new incompatible wrap error.
    #[must_use]
    pub fn new(wrapper: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            wrapper: wrapper.into(),
            reason: reason.into(),
        }
    }
}

/// Error raised for invalid pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The history capacity must hold at least one snapshot.
    #[error("History capacity must be at least 1")]
    ZeroCapacity,

    /// The configuration document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
