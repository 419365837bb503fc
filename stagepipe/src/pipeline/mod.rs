//! The pipeline facade and its flow machinery.
//!
//! This module provides:
//! - [`Pipeline`], generic over eager or lazy stage storage
//! - Flow sessions with automatic or manual balance
//! - Mode-dispatched operation application
//! - Tapped operations, output wrappers and configuration
//! - A small catalog of chain operations

mod apply;
mod config;
mod engine;
mod operation;
mod ops;
mod session;
mod wrapper;

#[cfg(test)]
mod integration_tests;

pub use apply::{modal, Modal, Transform};
pub use config::{FlowConfig, PipelineConfig};
pub use engine::{EagerPipeline, LazyPipeline, Pipeline};
pub use operation::{Callable, Operation};
pub use session::Session;
pub use wrapper::{Output, Wrapper};
