//! Evaluation mode, balance policy and flow kinds.

use super::{RoleMap, StageName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How operations see the work stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The whole work stage is one aggregate value.
    One,
    /// Each item is handled independently.
    #[default]
    Many,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "one"),
            Self::Many => write!(f, "many"),
        }
    }
}

/// Whether source and sink are kept in step after each session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Balance {
    /// Results are copied into both sink and source.
    #[default]
    Auto,
    /// Only the sink is updated; callers rebalance explicitly.
    Manual,
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// The shape of a flow session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Work and hold both alias the source; changes are visible in place.
    OneStep,
    /// Work re-reads the sink and results are written back to the source.
    TwoStep,
    /// Work consumes the source directly through a real staging buffer.
    ThreeStep,
    /// All four roles are distinct stages.
    #[default]
    FourStep,
}

impl Flow {
    /// Returns the role table used while a session of this kind is open.
    #[must_use]
    pub const fn roles(self) -> RoleMap {
        use StageName::{Sink, Source, Staging, Work};
        match self {
            Self::OneStep => RoleMap::from_stages(Source, Source, Source, Sink),
            Self::TwoStep => RoleMap::from_stages(Source, Sink, Source, Sink),
            Self::ThreeStep => RoleMap::from_stages(Source, Source, Staging, Sink),
            Self::FourStep => RoleMap::from_stages(Source, Work, Staging, Sink),
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneStep => write!(f, "one_step"),
            Self::TwoStep => write!(f, "two_step"),
            Self::ThreeStep => write!(f, "three_step"),
            Self::FourStep => write!(f, "four_step"),
        }
    }
}
