//! The four stages of a pipeline and the role table over them.

use super::{Items, StageBuffer};
use crate::core::{RoleMap, StageName, StageRole};
use std::fmt;
use std::marker::PhantomData;

/// Source, work, staging and sink, plus the roles they currently play.
pub struct StageSet<T, S> {
    stages: [S; 4],
    roles: RoleMap,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> StageSet<T, S>
where
    S: StageBuffer<T>,
{
    /// Creates a set whose source holds `source` and whose other stages are
    /// empty.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            stages: [source, S::default(), S::default(), S::default()],
            roles: RoleMap::default(),
            _item: PhantomData,
        }
    }

    /// Returns the current role table.
    #[must_use]
    pub const fn roles(&self) -> RoleMap {
        self.roles
    }

    /// True when the stages are iterator-backed.
    #[must_use]
    pub fn is_lazy(&self) -> bool {
        self.stages[0].is_lazy()
    }

    /// Rebinds every role. Never moves data.
    pub fn assign_roles(
        &mut self,
        input: StageName,
        work: StageName,
        hold: StageName,
        out: StageName,
    ) {
        self.roles = RoleMap::from_stages(input, work, hold, out);
    }

    /// Installs a prepared role table.
    pub fn set_roles(&mut self, roles: RoleMap) {
        self.roles = roles;
    }

    /// Goes back to in=source, work=work, hold=staging, out=sink.
    pub fn restore_default_roles(&mut self) {
        self.roles = RoleMap::default();
    }

    /// Returns the stage playing `role`.
    pub fn current(&mut self, role: StageRole) -> &mut S {
        let name = self.roles.resolve(role);
        self.stage(name)
    }

    /// Returns a physical stage regardless of roles.
    pub fn stage(&mut self, name: StageName) -> &mut S {
        &mut self.stages[name.index()]
    }

    /// Moves everything from one role into another through `apply`.
    ///
    /// The `from` stage is drained first, so when both roles resolve to the
    /// same stage its contents are replaced by the result.
    pub fn advance<F>(&mut self, from: StageRole, to: StageRole, apply: F)
    where
        F: FnOnce(Items<T>) -> Items<T>,
    {
        let items = self.current(from).take();
        let produced = apply(items);
        self.current(to).extend(produced);
    }

    /// Appends a copy of `from` to `to`, leaving `from` intact.
    pub fn copy_into(&mut self, from: StageName, to: StageName) {
        let copy = self.stage(from).duplicate();
        self.stage(to).extend(copy.into_items());
    }

    /// Replaces `to` with a copy of `from`.
    pub fn mirror(&mut self, from: StageName, to: StageName) {
        if from == to {
            return;
        }
        let copy = self.stage(from).duplicate();
        self.stage(to).replace(copy.into_items());
    }

    /// Counts the items in a stage without consuming them.
    pub fn count(&mut self, name: StageName) -> usize {
        self.stage(name).count()
    }

    /// Empties all four stages.
    pub fn clear_all(&mut self) {
        for stage in &mut self.stages {
            stage.clear();
        }
    }
}

impl<T, S> fmt::Debug for StageSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSet")
            .field("roles", &self.roles.to_string())
            .finish_non_exhaustive()
    }
}
