//! Bounded undo history of the source stage.
//!
//! Snapshots are kept most-recent-first. Once the capacity is exceeded the
//! oldest snapshot is dropped. Two markers live outside the bounded list:
//! `baseline`, the state query sessions revert to, and `origin`, the state
//! the pipeline was built with, which is written once and never evicted.

mod snapshot;

pub use snapshot::{Snapshot, SnapshotId, UndoTarget};

use crate::errors::EmptyHistoryError;
use crate::stages::StageBuffer;
use std::collections::VecDeque;
use std::fmt;
use std::marker::PhantomData;
use tracing::trace;

/// Default number of snapshots retained.
pub const DEFAULT_CAPACITY: usize = 5;

/// Bounded record of source snapshots.
pub struct History<T, S> {
    entries: VecDeque<Snapshot<S>>,
    capacity: usize,
    baseline: Option<Snapshot<S>>,
    origin: Option<Snapshot<S>>,
    next_id: u64,
    _item: PhantomData<fn() -> T>,
}

impl<T, S> History<T, S>
where
    S: StageBuffer<T>,
{
    /// Creates an empty history. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            baseline: None,
            origin: None,
            next_id: 0,
            _item: PhantomData,
        }
    }

    fn allocate_id(&mut self) -> SnapshotId {
        let id = SnapshotId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Records the construction state. Only the first call has any effect.
    pub fn record_origin(&mut self, source: &mut S) -> Option<SnapshotId> {
        if self.origin.is_some() {
            return None;
        }
        let id = self.allocate_id();
        self.origin = Some(Snapshot::new(id, source.duplicate()));
        Some(id)
    }

    /// Copies `source` to the front of the history.
    ///
    /// The oldest snapshot is evicted when the capacity is exceeded.
    /// `as_baseline` also stores the copy as the baseline marker; `as_origin`
    /// stores it as the origin marker unless one was already recorded.
    pub fn snapshot(&mut self, source: &mut S, as_baseline: bool, as_origin: bool) -> SnapshotId {
        let id = self.allocate_id();
        let mut copy = source.duplicate();

        if as_baseline {
            self.baseline = Some(Snapshot::new(id, copy.duplicate()));
        }
        if as_origin && self.origin.is_none() {
            self.origin = Some(Snapshot::new(id, copy.duplicate()));
        }

        self.entries.push_front(Snapshot::new(id, copy));
        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_back() {
                trace!(snapshot = %evicted.id(), capacity = self.capacity, "Evicted snapshot");
            }
        }
        id
    }

    /// Removes and returns the state selected by `target`.
    ///
    /// - `Origin` returns a copy of the origin and clears the history and
    ///   baseline.
    /// - `Baseline` returns a copy of the baseline and clears the history.
    /// - `Latest` pops the most recent snapshot.
    /// - `Steps(n)` rotates the history left by `n - 1` and pops the front;
    ///   the `n - 1` newer snapshots move to the back.
    ///
    /// Nothing changes when the target does not exist.
    pub fn undo(&mut self, target: UndoTarget) -> Result<S, EmptyHistoryError> {
        let missing = EmptyHistoryError::new(target, self.entries.len());
        match target {
            UndoTarget::Origin => {
                let origin = self.origin.as_mut().ok_or(missing)?;
                let restored = origin.stage_mut().duplicate();
                self.entries.clear();
                self.baseline = None;
                Ok(restored)
            }
            UndoTarget::Baseline => {
                let baseline = self.baseline.as_mut().ok_or(missing)?;
                let restored = baseline.stage_mut().duplicate();
                self.entries.clear();
                Ok(restored)
            }
            UndoTarget::Latest | UndoTarget::Steps(0) => self
                .entries
                .pop_front()
                .map(Snapshot::into_stage)
                .ok_or(missing),
            UndoTarget::Steps(n) => {
                if n > self.entries.len() {
                    return Err(missing);
                }
                self.entries.rotate_left(n - 1);
                self.entries
                    .pop_front()
                    .map(Snapshot::into_stage)
                    .ok_or(missing)
            }
        }
    }

    /// Returns a copy of the baseline without consuming it.
    pub fn baseline(&mut self) -> Option<S> {
        self.baseline.as_mut().map(|b| b.stage_mut().duplicate())
    }

    /// Returns the items of the snapshot at `index` (0 is most recent).
    pub fn contents(&mut self, index: usize) -> Option<Vec<T>> {
        self.entries.get_mut(index).map(|s| s.stage_mut().to_vec())
    }

    /// Ids of the retained snapshots, most recent first.
    #[must_use]
    pub fn ids(&self) -> Vec<SnapshotId> {
        self.entries.iter().map(Snapshot::id).collect()
    }

    /// Drops all snapshots and the baseline. The origin is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.baseline = None;
    }

    /// Number of retained snapshots, markers excluded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no snapshot is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained snapshots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when a baseline is set.
    #[must_use]
    pub const fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// True when the origin is recorded.
    #[must_use]
    pub const fn has_origin(&self) -> bool {
        self.origin.is_some()
    }
}

impl<T, S> Default for History<T, S>
where
    S: StageBuffer<T>,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<T, S> fmt::Debug for History<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("baseline", &self.baseline.as_ref().map(Snapshot::id))
            .field("origin", &self.origin.as_ref().map(Snapshot::id))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::{EagerStage, LazyStage};
    use pretty_assertions::assert_eq;

    fn stage(items: Vec<i32>) -> EagerStage<i32> {
        EagerStage::from_items(items)
    }

    fn filled(states: &[Vec<i32>], capacity: usize) -> History<i32, EagerStage<i32>> {
        let mut history = History::new(capacity);
        for state in states {
            history.snapshot(&mut stage(state.clone()), false, false);
        }
        history
    }

    #[test]
    fn test_undo_latest_pops_most_recent() {
        let mut history = filled(&[vec![1], vec![1, 2]], 5);
        let restored = history.undo(UndoTarget::Latest).unwrap();

        assert_eq!(restored.into_items().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_empty_history_fails() {
        let mut history: History<i32, EagerStage<i32>> = History::default();
        let err = history.undo(UndoTarget::Latest).unwrap_err();

        assert_eq!(err.target, UndoTarget::Latest);
        assert!(history.undo(UndoTarget::Baseline).is_err());
        assert!(history.undo(UndoTarget::Origin).is_err());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let states: Vec<Vec<i32>> = (0..8).map(|i| vec![i]).collect();
        let mut history = filled(&states, 3);

        assert_eq!(history.len(), 3);
        assert_eq!(history.contents(0), Some(vec![7]));
        assert_eq!(history.contents(2), Some(vec![5]));
        assert_eq!(history.contents(3), None);
    }

    #[test]
    fn test_steps_rotate_then_pop() {
        let states: Vec<Vec<i32>> = (1..=4).map(|i| vec![i]).collect();
        let mut history = filled(&states, 5);

        // Most recent first: [4], [3], [2], [1]. Two back is [3].
        let restored = history.undo(UndoTarget::Steps(2)).unwrap();
        assert_eq!(restored.into_items().collect::<Vec<_>>(), vec![3]);

        // [4] rotated to the back.
        assert_eq!(history.contents(0), Some(vec![2]));
        assert_eq!(history.contents(2), Some(vec![4]));
    }

    #[test]
    fn test_zero_steps_undoes_latest() {
        let states: Vec<Vec<i32>> = (1..=3).map(|i| vec![i]).collect();
        let mut history = filled(&states, 5);

        let restored = history.undo(UndoTarget::Steps(0)).unwrap();
        assert_eq!(restored.into_items().collect::<Vec<_>>(), vec![3]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.contents(0), Some(vec![2]));
        assert_eq!(history.contents(1), Some(vec![1]));
    }

    #[test]
    fn test_steps_beyond_history_leaves_it_unchanged() {
        let mut history = filled(&[vec![1], vec![2]], 5);
        let ids = history.ids();

        assert!(history.undo(UndoTarget::Steps(3)).is_err());
        assert_eq!(history.ids(), ids);
    }

    #[test]
    fn test_origin_survives_eviction_and_is_reusable() {
        let mut history: History<i32, EagerStage<i32>> = History::new(2);
        history.record_origin(&mut stage(vec![9, 9]));
        assert!(history.record_origin(&mut stage(vec![0])).is_none());

        for i in 0..6 {
            history.snapshot(&mut stage(vec![i]), false, true);
        }

        let first = history.undo(UndoTarget::Origin).unwrap();
        assert_eq!(first.into_items().collect::<Vec<_>>(), vec![9, 9]);
        assert!(history.is_empty());

        let again = history.undo(UndoTarget::Origin).unwrap();
        assert_eq!(again.into_items().collect::<Vec<_>>(), vec![9, 9]);
    }

    #[test]
    fn test_baseline_undo_clears_history() {
        let mut history: History<i32, EagerStage<i32>> = History::new(5);
        history.snapshot(&mut stage(vec![1]), true, false);
        history.snapshot(&mut stage(vec![2]), false, false);

        let restored = history.undo(UndoTarget::Baseline).unwrap();
        assert_eq!(restored.into_items().collect::<Vec<_>>(), vec![1]);
        assert!(history.is_empty());
        assert!(history.has_baseline());
    }

    #[test]
    fn test_lazy_snapshot_does_not_alias_source() {
        let mut source = LazyStage::from_items(vec![1, 2, 3]);
        let mut history: History<i32, LazyStage<i32>> = History::new(5);
        history.snapshot(&mut source, false, false);

        let _ = source.take().count();
        assert!(source.to_vec().is_empty());

        let restored = history.undo(UndoTarget::Latest).unwrap();
        assert_eq!(restored.into_items().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
