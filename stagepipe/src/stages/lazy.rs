//! Iterator-backed stage storage.

use super::{Items, StageBuffer, Tee};
use std::fmt;

/// A stage that holds a single-pass iterator.
///
/// Nothing is evaluated until the items are pulled. Anything that needs to
/// read the stage without consuming it (copies, counts, snapshots) splits the
/// iterator with [`Tee`] and keeps one branch. Once split, further copies fork
/// the kept branch, so repeated reads share one buffer.
pub struct LazyStage<T> {
    pending: Pending<T>,
}

enum Pending<T> {
    Plain(Items<T>),
    Shared(Tee<T>),
}

impl<T: 'static> Pending<T> {
    fn empty() -> Self {
        Self::Plain(Box::new(std::iter::empty()))
    }
}

impl<T: 'static> Default for LazyStage<T> {
    fn default() -> Self {
        Self {
            pending: Pending::empty(),
        }
    }
}

impl<T> fmt::Debug for LazyStage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = matches!(self.pending, Pending::Shared(_));
        f.debug_struct("LazyStage")
            .field("shared", &shared)
            .finish_non_exhaustive()
    }
}

impl<T> StageBuffer<T> for LazyStage<T>
where
    T: Clone + 'static,
{
    fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self {
            pending: Pending::Plain(Box::new(items.into_iter())),
        }
    }

    fn take(&mut self) -> Items<T> {
        match std::mem::replace(&mut self.pending, Pending::empty()) {
            Pending::Plain(iter) => iter,
            Pending::Shared(branch) => Box::new(branch),
        }
    }

    fn extend(&mut self, items: Items<T>) {
        let current = self.take();
        self.pending = Pending::Plain(Box::new(current.chain(items)));
    }

    fn clear(&mut self) {
        self.pending = Pending::empty();
    }

    fn duplicate(&mut self) -> Self {
        if let Pending::Shared(branch) = &self.pending {
            return Self {
                pending: Pending::Shared(branch.fork()),
            };
        }
        let (kept, copy) = Tee::split(self.take());
        self.pending = Pending::Shared(kept);
        Self {
            pending: Pending::Shared(copy),
        }
    }

    fn count(&mut self) -> usize {
        self.duplicate().take().count()
    }

    fn is_lazy(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_extend_does_not_pull() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let mut stage = LazyStage::<i32>::default();

        stage.extend(Box::new((1..=3).inspect(move |_| counter.set(counter.get() + 1))));
        assert_eq!(pulled.get(), 0);

        assert_eq!(stage.take().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn test_exhausted_stage_reads_empty() {
        let mut stage = LazyStage::from_items(vec![1, 2]);
        let _ = stage.take().count();
        assert_eq!(stage.take().count(), 0);
        assert!(stage.to_vec().is_empty());
    }

    #[test]
    fn test_count_and_to_vec_keep_contents() {
        let mut stage = LazyStage::from_items(vec![4, 5, 6]);
        assert_eq!(stage.count(), 3);
        assert_eq!(stage.to_vec(), vec![4, 5, 6]);
        assert_eq!(stage.take().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn test_duplicate_is_independent() {
        let mut stage = LazyStage::from_items(vec![1, 2, 3]);
        let copy = stage.duplicate();

        assert_eq!(copy.into_items().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(stage.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_repeated_reads_do_not_nest() {
        let mut stage = LazyStage::from_items((0..4).map(|x| x * 10));
        for _ in 0..20_000 {
            assert_eq!(stage.count(), 4);
        }
        let copy = stage.duplicate();

        assert_eq!(stage.to_vec(), vec![0, 10, 20, 30]);
        assert_eq!(copy.into_items().collect::<Vec<_>>(), vec![0, 10, 20, 30]);
    }

    #[test]
    fn test_duplicate_of_copy_stays_independent() {
        let mut stage = LazyStage::from_items(vec![1, 2]);
        let mut copy = stage.duplicate();
        let mut second = copy.duplicate();

        assert_eq!(second.take().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(copy.take().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(stage.take().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(second.count(), 0);
    }
}
