//! Source snapshots and undo targets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a captured snapshot, unique within one history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SnapshotId(pub u64);

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshot#{}", self.0)
    }
}

/// An owned copy of the source stage at one point in time.
#[derive(Debug)]
pub struct Snapshot<S> {
    id: SnapshotId,
    stage: S,
}

impl<S> Snapshot<S> {
    pub(crate) const fn new(id: SnapshotId, stage: S) -> Self {
        Self { id, stage }
    }

    /// Returns the snapshot id.
    #[must_use]
    pub const fn id(&self) -> SnapshotId {
        self.id
    }

    pub(crate) fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub(crate) fn into_stage(self) -> S {
        self.stage
    }
}

/// Which recorded state an undo should return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UndoTarget {
    /// The most recent snapshot.
    #[default]
    Latest,
    /// The snapshot `n` captures ago, counting the most recent as 1.
    /// `Steps(0)` behaves like [`UndoTarget::Latest`].
    Steps(usize),
    /// The baseline marker set by query sessions.
    Baseline,
    /// The state the pipeline was constructed with.
    Origin,
}

impl fmt::Display for UndoTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest | Self::Steps(0) => write!(f, "latest snapshot"),
            Self::Steps(n) => write!(f, "snapshot {n} steps back"),
            Self::Baseline => write!(f, "baseline"),
            Self::Origin => write!(f, "origin"),
        }
    }
}
