//! Testing utilities for stagepipe pipelines.
//!
//! This module provides:
//! - Assertions over stage contents, balance and history
//! - Pipeline fixtures for eager and lazy storage
//! - Log capture for tests

mod assertions;
mod fixtures;

pub use assertions::{
    assert_balanced, assert_history_len, assert_same_results, assert_sink_eq, assert_source_eq,
};
pub use fixtures::{init_tracing, numbers, pairs, PipelineFixture};
