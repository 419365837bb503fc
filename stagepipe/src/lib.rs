//! # Stagepipe
//!
//! A fluent pipeline that moves items through four buffered stages.
//!
//! Stagepipe provides:
//!
//! - **Four stages**: source, work, staging and sink, rebound per flow session
//! - **Eager or lazy storage**: materialised queues or single-pass iterators
//! - **Balance control**: results mirrored back into the source, or left for
//!   an explicit rebalance
//! - **Bounded undo**: source snapshots with baseline and origin markers
//! - **Mode dispatch**: operations see work as one value or item by item
//!
//! ## Quick Start
//!
//! ```rust
//! use stagepipe::prelude::*;
//!
//! let mut pipeline = EagerPipeline::new(vec![5, 4, 3, 2, 1]);
//! pipeline.filter(|x| x % 2 == 1).sort();
//! assert_eq!(pipeline.drain().unwrap().into_vec(), vec![1, 3, 5]);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod errors;
pub mod history;
pub mod pipeline;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{Balance, Flow, Mode, RoleMap, StageName, StageRole};
    pub use crate::errors::{
        ConfigError, EmptyHistoryError, EmptyStageError, IncompatibleWrapError, PipelineError,
        Result,
    };
    pub use crate::history::{History, SnapshotId, UndoTarget};
    pub use crate::pipeline::{
        modal, EagerPipeline, FlowConfig, LazyPipeline, Operation, Output, Pipeline,
        PipelineConfig, Session, Transform, Wrapper,
    };
    pub use crate::stages::{EagerStage, Items, LazyStage, StageBuffer};
}
