//! The pipeline facade.

use super::{FlowConfig, Operation, Output, PipelineConfig, Session, Wrapper};
use crate::core::{Balance, Mode, StageName};
use crate::errors::{EmptyStageError, Result};
use crate::history::{History, UndoTarget};
use crate::stages::{EagerStage, LazyStage, StageBuffer, StageSet};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// A four-stage pipeline over items of type `T`, stored as `S`.
///
/// Construction places the items in the source stage and records them as the
/// origin. Every chain call runs one [`Session`]; terminals read the sink
/// through the installed [`Wrapper`].
pub struct Pipeline<T, S = EagerStage<T>> {
    pub(crate) id: Uuid,
    pub(crate) stages: StageSet<T, S>,
    pub(crate) history: History<T, S>,
    pub(crate) config: PipelineConfig,
    pub(crate) mode: Mode,
    pub(crate) balance: Balance,
    pub(crate) operation: Option<Operation<T>>,
    pub(crate) wrapper: Wrapper<T>,
}

/// A pipeline whose stages are materialised queues.
pub type EagerPipeline<T> = Pipeline<T, EagerStage<T>>;

/// A pipeline whose stages are single-pass iterators.
pub type LazyPipeline<T> = Pipeline<T, LazyStage<T>>;

impl<T, S> Pipeline<T, S>
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    /// Creates a pipeline with the default configuration.
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::build(items, PipelineConfig::default())
    }

    /// Creates a pipeline from an explicit configuration.
    pub fn with_config<I>(items: I, config: PipelineConfig) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        config.validate()?;
        Ok(Self::build(items, config))
    }

    fn build<I>(items: I, config: PipelineConfig) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let mut stages: StageSet<T, S> = StageSet::new(S::from_items(items));
        let mut history: History<T, S> = History::new(config.history_capacity);
        history.record_origin(stages.stage(StageName::Source));

        let pipeline = Self {
            id: Uuid::new_v4(),
            stages,
            history,
            mode: config.mode,
            balance: config.balance,
            config,
            operation: None,
            wrapper: Wrapper::list(),
        };
        debug!(
            pipeline_id = %pipeline.id,
            mode = %pipeline.mode,
            balance = %pipeline.balance,
            history_capacity = pipeline.config.history_capacity,
            "Created pipeline"
        );
        pipeline
    }

    /// Returns the pipeline id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the configuration the pipeline was built with.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the active mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the active balance policy.
    #[must_use]
    pub const fn balance(&self) -> Balance {
        self.balance
    }

    /// Operations see all of work as one value.
    pub fn one(&mut self) -> &mut Self {
        self.mode = Mode::One;
        self
    }

    /// Operations see each item on its own.
    pub fn many(&mut self) -> &mut Self {
        self.mode = Mode::Many;
        self
    }

    /// Copies results back into the source after every chain call.
    pub fn auto(&mut self) -> &mut Self {
        self.balance = Balance::Auto;
        self
    }

    /// Leaves the source alone; see [`Pipeline::rebalance`].
    pub fn manual(&mut self) -> &mut Self {
        self.balance = Balance::Manual;
        self
    }

    /// Installs the operation later chain calls read.
    pub fn tap(&mut self, operation: Operation<T>) -> &mut Self {
        debug!(pipeline_id = %self.id, operation = operation.name(), "Tapped operation");
        self.operation = Some(operation);
        self
    }

    /// Removes the installed operation.
    pub fn untap(&mut self) -> &mut Self {
        self.operation = None;
        self
    }

    /// Returns the installed operation.
    #[must_use]
    pub const fn current_operation(&self) -> Option<&Operation<T>> {
        self.operation.as_ref()
    }

    /// Sets the wrapper applied by [`Pipeline::drain`] and [`Pipeline::peek`].
    pub fn wrap(&mut self, wrapper: Wrapper<T>) -> &mut Self {
        self.wrapper = wrapper;
        self
    }

    /// Goes back to the identity list wrapper.
    pub fn unwrap(&mut self) -> &mut Self {
        self.wrapper = Wrapper::list();
        self
    }

    /// Returns the installed wrapper.
    #[must_use]
    pub const fn wrapper(&self) -> &Wrapper<T> {
        &self.wrapper
    }

    /// Returns the undo history.
    #[must_use]
    pub const fn history(&self) -> &History<T, S> {
        &self.history
    }

    /// Number of retained snapshots.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Copies the source contents out.
    pub fn source(&mut self) -> Vec<T> {
        self.stages.stage(StageName::Source).to_vec()
    }

    /// Copies the sink contents out.
    pub fn sink(&mut self) -> Vec<T> {
        self.stages.stage(StageName::Sink).to_vec()
    }

    /// True when source and sink hold the same number of items.
    pub fn balanced(&mut self) -> bool {
        self.stages.count(StageName::Sink) == self.stages.count(StageName::Source)
    }

    /// Opens a flow session. It closes when the returned guard is dropped.
    pub fn session(&mut self, config: impl Into<FlowConfig>) -> Session<'_, T, S> {
        Session::enter(self, config.into())
    }

    /// Runs `f` inside one flow session.
    pub fn chain<F>(&mut self, config: impl Into<FlowConfig>, f: F) -> &mut Self
    where
        F: FnOnce(&mut Session<'_, T, S>),
    {
        let mut session = self.session(config);
        f(&mut session);
        drop(session);
        self
    }

    /// Runs `f` in a query session and returns the wrapped sink.
    ///
    /// The source is put back to what it was before the call.
    pub fn query<F>(&mut self, f: F) -> Result<Output<T>>
    where
        F: FnOnce(&mut Session<'_, T, S>),
    {
        self.chain(FlowConfig::query(), f);
        self.peek()
    }

    /// Replaces the source with a copy of the sink.
    pub fn rebalance(&mut self) -> &mut Self {
        self.stages.mirror(StageName::Sink, StageName::Source);
        self
    }

    /// Empties every stage and the history. The origin survives.
    pub fn clear(&mut self) -> &mut Self {
        self.stages.clear_all();
        self.history.clear();
        self
    }

    /// Reads the sink through the wrapper without changing anything.
    pub fn peek(&mut self) -> Result<Output<T>> {
        let items = self.sink();
        self.wrapper.wrap(self.mode, items)
    }

    /// Reads the sink through the wrapper.
    ///
    /// Eager pipelines are cleared afterwards; lazy pipelines only read a
    /// copy. A wrapper failure leaves the pipeline as it was.
    pub fn drain(&mut self) -> Result<Output<T>> {
        let output = self.peek()?;
        if !self.stages.is_lazy() {
            self.clear();
        }
        debug!(
            pipeline_id = %self.id,
            wrapper = self.wrapper.name(),
            items = output.len(),
            "Drained pipeline"
        );
        Ok(output)
    }

    /// Restores the source from the most recent snapshot.
    pub fn undo(&mut self) -> Result<&mut Self> {
        self.undo_to(UndoTarget::Latest)
    }

    /// Restores the source from `target`.
    ///
    /// Work, staging and sink are emptied; under automatic balance the sink
    /// then mirrors the restored source. Nothing changes when the target is
    /// missing.
    pub fn undo_to(&mut self, target: UndoTarget) -> Result<&mut Self> {
        let restored = self.history.undo(target)?;
        self.stages.clear_all();
        self.stages
            .stage(StageName::Source)
            .extend(restored.into_items());
        if self.balance == Balance::Auto {
            self.stages.mirror(StageName::Source, StageName::Sink);
        }
        debug!(
            pipeline_id = %self.id,
            %target,
            remaining = self.history.len(),
            "Undid pipeline state"
        );
        Ok(self)
    }

    /// Returns the source item at `index`.
    pub fn nth(&mut self, index: usize) -> Result<T> {
        let items = self.source();
        let len = items.len();
        items
            .into_iter()
            .nth(index)
            .ok_or_else(|| EmptyStageError::new(StageName::Source, index, len).into())
    }

    /// Returns the source item at `index`, or `default`.
    pub fn nth_or(&mut self, index: usize, default: T) -> T {
        self.nth(index).unwrap_or(default)
    }

    /// Returns the first source item.
    pub fn first_item(&mut self) -> Result<T> {
        self.nth(0)
    }

    /// Returns the last source item.
    pub fn last_item(&mut self) -> Result<T> {
        let mut items = self.source();
        items
            .pop()
            .ok_or_else(|| EmptyStageError::new(StageName::Source, 0, 0).into())
    }
}

impl<T, S> fmt::Debug for Pipeline<T, S>
where
    S: StageBuffer<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("id", &self.id.to_string())
            .field("mode", &self.mode)
            .field("balance", &self.balance)
            .field("lazy", &self.stages.is_lazy())
            .field("stages", &self.stages)
            .field("history", &self.history)
            .field("operation", &self.operation)
            .field("wrapper", &self.wrapper)
            .finish()
    }
}
