//! Stage names, logical roles and the role table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four physical buffers owned by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Incoming items.
    Source,
    /// Items an operation is currently reading.
    Work,
    /// Results waiting to be moved to the sink.
    Staging,
    /// Outgoing items.
    Sink,
}

impl StageName {
    /// All stage names in storage order.
    pub const ALL: [Self; 4] = [Self::Source, Self::Work, Self::Staging, Self::Sink];

    /// Returns the storage slot of this stage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Source => 0,
            Self::Work => 1,
            Self::Staging => 2,
            Self::Sink => 3,
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Work => write!(f, "work"),
            Self::Staging => write!(f, "staging"),
            Self::Sink => write!(f, "sink"),
        }
    }
}

/// The logical part a stage plays during a flow session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageRole {
    /// Where a session reads its input from.
    In,
    /// What the operation consumes.
    Work,
    /// Where the operation writes.
    Hold,
    /// Where results land when the session closes.
    Out,
}

impl StageRole {
    /// All roles in table order.
    pub const ALL: [Self; 4] = [Self::In, Self::Work, Self::Hold, Self::Out];

    const fn index(self) -> usize {
        match self {
            Self::In => 0,
            Self::Work => 1,
            Self::Hold => 2,
            Self::Out => 3,
        }
    }
}

impl fmt::Display for StageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Work => write!(f, "work"),
            Self::Hold => write!(f, "hold"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// Maps each role onto the stage currently filling it.
///
/// Several roles may resolve to the same stage; reassigning roles never
/// moves data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleMap {
    slots: [StageName; 4],
}

impl Default for RoleMap {
    fn default() -> Self {
        Self {
            slots: [
                StageName::Source,
                StageName::Work,
                StageName::Staging,
                StageName::Sink,
            ],
        }
    }
}

impl RoleMap {
    /// Creates the default mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapping from explicit assignments.
    #[must_use]
    pub const fn from_stages(
        input: StageName,
        work: StageName,
        hold: StageName,
        out: StageName,
    ) -> Self {
        Self {
            slots: [input, work, hold, out],
        }
    }

    /// Returns the stage currently playing `role`.
    #[must_use]
    pub const fn resolve(&self, role: StageRole) -> StageName {
        self.slots[role.index()]
    }

    /// Returns true when both roles resolve to the same stage.
    #[must_use]
    pub fn aliased(&self, a: StageRole, b: StageRole) -> bool {
        self.resolve(a) == self.resolve(b)
    }

    /// Returns true when this is the default mapping.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for RoleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = StageRole::ALL
            .iter()
            .map(|role| format!("{role}={}", self.resolve(*role)))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
