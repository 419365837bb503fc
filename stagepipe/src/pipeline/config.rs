//! Pipeline and flow session configuration.

use crate::core::{Balance, Flow, Mode};
use crate::errors::ConfigError;
use crate::history::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Settings a pipeline is constructed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of source snapshots kept for undo.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Initial evaluation mode.
    #[serde(default)]
    pub mode: Mode,
    /// Initial balance policy.
    #[serde(default)]
    pub balance: Balance,
    /// Whether chain calls snapshot the source before running.
    #[serde(default = "default_snapshot_on_chain")]
    pub snapshot_on_chain: bool,
}

const fn default_history_capacity() -> usize {
    DEFAULT_CAPACITY
}

const fn default_snapshot_on_chain() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            mode: Mode::default(),
            balance: Balance::default(),
            snapshot_on_chain: default_snapshot_on_chain(),
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the history capacity.
    #[must_use]
    pub const fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Sets the initial mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the initial balance policy.
    #[must_use]
    pub const fn with_balance(mut self, balance: Balance) -> Self {
        self.balance = balance;
        self
    }

    /// Enables or disables snapshots before chain calls.
    #[must_use]
    pub const fn with_snapshots(mut self, enabled: bool) -> Self {
        self.snapshot_on_chain = enabled;
        self
    }

    /// Checks the configuration.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.history_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

/// Settings for a single flow session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Role layout used while the session is open.
    #[serde(default)]
    pub flow: Flow,
    /// Append to the sink instead of replacing it.
    #[serde(default)]
    pub accumulate: bool,
    /// Snapshot the source on entry (subject to the pipeline setting).
    #[serde(default = "default_snapshot_on_chain")]
    pub snapshot: bool,
    /// Snapshot as baseline and restore the source from it on exit.
    #[serde(default)]
    pub query: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::new(Flow::default())
    }
}

impl FlowConfig {
    /// Creates a session configuration for `flow`.
    #[must_use]
    pub const fn new(flow: Flow) -> Self {
        Self {
            flow,
            accumulate: false,
            snapshot: true,
            query: false,
        }
    }

    /// A four-step session that leaves the source as it found it.
    #[must_use]
    pub const fn query() -> Self {
        Self {
            flow: Flow::FourStep,
            accumulate: false,
            snapshot: true,
            query: true,
        }
    }

    /// Keeps existing sink contents and appends new results after them.
    #[must_use]
    pub const fn accumulating(mut self) -> Self {
        self.accumulate = true;
        self
    }

    /// Skips the entry snapshot.
    #[must_use]
    pub const fn without_snapshot(mut self) -> Self {
        self.snapshot = false;
        self
    }
}

impl From<Flow> for FlowConfig {
    fn from(flow: Flow) -> Self {
        Self::new(flow)
    }
}
