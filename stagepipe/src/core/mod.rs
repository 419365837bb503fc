//! Core domain model types for stagepipe.
//!
//! This module contains the small vocabulary shared by every other module:
//! - Physical stage names and logical roles
//! - The role table that maps one onto the other
//! - Evaluation mode, balance policy and flow kinds

mod mode;
mod role;

pub use mode::{Balance, Flow, Mode};
pub use role::{RoleMap, StageName, StageRole};
