//! Flow sessions.
//!
//! A [`Session`] rebinds the stage roles for one chain call and moves data
//! on the way in and out. The exit actions live in `Drop`, so the default
//! role table comes back on every path out of a session.

use super::{FlowConfig, Operation, Pipeline};
use crate::core::{Balance, Flow, Mode, StageName, StageRole};
use crate::history::SnapshotId;
use crate::stages::{Items, StageBuffer};
use tracing::{debug, trace};

/// An open flow session over a pipeline.
///
/// Entry snapshots the source when configured, installs the flow's role
/// table, copies the input into the work stage for four-step flows and
/// clears a hold stage that is about to be rewritten. Exit moves the hold
/// contents to the out role (clearing it first unless accumulating),
/// mirrors the out role back into the input under automatic balance,
/// reverts query sessions to their baseline, empties the work and staging
/// buffers and restores the default roles.
///
/// If no operation ran, the work contents pass through unchanged.
pub struct Session<'p, T, S>
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    pipeline: &'p mut Pipeline<T, S>,
    config: FlowConfig,
    snapshot: Option<SnapshotId>,
    advanced: bool,
}

impl<'p, T, S> Session<'p, T, S>
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    pub(crate) fn enter(pipeline: &'p mut Pipeline<T, S>, config: FlowConfig) -> Self {
        let snapshot = if config.query || (config.snapshot && pipeline.config.snapshot_on_chain) {
            Some(pipeline.history.snapshot(
                pipeline.stages.stage(StageName::Source),
                config.query,
                false,
            ))
        } else {
            None
        };

        let roles = config.flow.roles();
        let stages = &mut pipeline.stages;
        stages.set_roles(roles);
        stages.stage(StageName::Work).clear();
        stages.stage(StageName::Staging).clear();

        if roles.resolve(StageRole::Work) == StageName::Work {
            stages.copy_into(roles.resolve(StageRole::In), StageName::Work);
        }
        let hold = roles.resolve(StageRole::Hold);
        if hold != roles.resolve(StageRole::Work) && hold != StageName::Staging {
            stages.stage(hold).clear();
        }

        debug!(
            pipeline_id = %pipeline.id,
            flow = %config.flow,
            roles = %roles,
            snapshot = ?snapshot,
            "Entered flow session"
        );

        Self {
            pipeline,
            config,
            snapshot,
            advanced: false,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> FlowConfig {
        self.config
    }

    /// Returns the flow kind.
    #[must_use]
    pub const fn flow(&self) -> Flow {
        self.config.flow
    }

    /// Returns the pipeline's active mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.pipeline.mode
    }

    /// Returns the snapshot taken on entry, if any.
    #[must_use]
    pub const fn snapshot_id(&self) -> Option<SnapshotId> {
        self.snapshot
    }

    /// Returns the tapped operation.
    #[must_use]
    pub fn operation(&self) -> Option<&Operation<T>> {
        self.pipeline.operation.as_ref()
    }

    /// Copies out what the work role currently holds, without consuming it.
    pub fn work(&mut self) -> Vec<T> {
        self.pipeline.stages.current(StageRole::Work).to_vec()
    }

    /// Moves data from one role to another through `apply`.
    pub fn advance<F>(&mut self, from: StageRole, to: StageRole, apply: F)
    where
        F: FnOnce(Items<T>) -> Items<T>,
    {
        trace!(pipeline_id = %self.pipeline.id, %from, %to, "Advancing");
        self.advanced = true;
        self.pipeline.stages.advance(from, to, apply);
    }

    /// Rewrites the whole work sequence into the hold role, ignoring mode.
    pub fn transform<F>(&mut self, apply: F)
    where
        F: FnOnce(Items<T>) -> Items<T>,
    {
        self.advance(StageRole::Work, StageRole::Hold, apply);
    }

    fn exit(&mut self) {
        let stages = &mut self.pipeline.stages;
        let roles = stages.roles();
        let input = roles.resolve(StageRole::In);
        let hold = roles.resolve(StageRole::Hold);
        let out = roles.resolve(StageRole::Out);

        if !self.advanced && !roles.aliased(StageRole::Work, StageRole::Hold) {
            stages.advance(StageRole::Work, StageRole::Hold, |items| items);
        }

        let results = if hold == input {
            stages.stage(hold).duplicate().into_items()
        } else {
            stages.stage(hold).take()
        };
        if !self.config.accumulate {
            stages.stage(out).clear();
        }
        stages.stage(out).extend(results);

        if self.pipeline.balance == Balance::Auto {
            stages.mirror(out, input);
        }
        if self.config.query {
            if let Some(baseline) = self.pipeline.history.baseline() {
                stages.stage(input).replace(baseline.into_items());
            }
        }

        stages.stage(StageName::Work).clear();
        stages.stage(StageName::Staging).clear();
        stages.restore_default_roles();

        debug!(
            pipeline_id = %self.pipeline.id,
            flow = %self.config.flow,
            balance = %self.pipeline.balance,
            "Exited flow session"
        );
    }
}

impl<T, S> Drop for Session<'_, T, S>
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    fn drop(&mut self) {
        self.exit();
    }
}
