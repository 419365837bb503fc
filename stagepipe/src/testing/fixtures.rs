//! Test fixtures for pipeline testing.

use crate::core::{Balance, Mode};
use crate::errors::Result;
use crate::pipeline::{EagerPipeline, LazyPipeline, Pipeline, PipelineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs a log subscriber that writes through the test harness.
///
/// Honours `RUST_LOG`; defaults to `stagepipe=debug`. Safe to call from
/// every test.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stagepipe=debug"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

/// `1..=n` as a vector.
#[must_use]
pub fn numbers(n: i32) -> Vec<i32> {
    (1..=n).collect()
}

/// Key/value pairs for the mapping wrapper.
#[must_use]
pub fn pairs() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!(["a", 1]),
        serde_json::json!(["b", 2]),
        serde_json::json!(["c", 3]),
    ]
}

/// Builds matching eager and lazy pipelines from the same items.
#[derive(Debug, Clone)]
pub struct PipelineFixture<T> {
    /// Initial items.
    pub items: Vec<T>,
    /// Configuration both pipelines are built with.
    pub config: PipelineConfig,
}

impl<T> PipelineFixture<T>
where
    T: Clone + 'static,
{
    /// Creates a fixture with the default configuration.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            config: PipelineConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses manual balance.
    #[must_use]
    pub fn manual(mut self) -> Self {
        self.config.balance = Balance::Manual;
        self
    }

    /// Starts in `One` mode.
    #[must_use]
    pub fn one(mut self) -> Self {
        self.config.mode = Mode::One;
        self
    }

    /// Sets the history capacity.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Builds an eager pipeline.
    pub fn eager(&self) -> Result<EagerPipeline<T>> {
        Pipeline::with_config(self.items.clone(), self.config.clone())
    }

    /// Builds a lazy pipeline.
    pub fn lazy(&self) -> Result<LazyPipeline<T>> {
        Pipeline::with_config(self.items.clone(), self.config.clone())
    }
}
