//! Stage storage and evaluation strategies.
//!
//! A stage is an ordered sequence of items. Two storage strategies implement
//! [`StageBuffer`]:
//! - [`EagerStage`]: a materialised double-ended queue
//! - [`LazyStage`]: a single-pass boxed iterator, duplicated through [`Tee`]
//!
//! [`StageSet`] holds the four stages of one pipeline together with the role
//! table, and moves data between roles with [`StageSet::advance`].

mod eager;
mod lazy;
mod set;
mod tee;

pub use eager::EagerStage;
pub use lazy::LazyStage;
pub use set::StageSet;
pub use tee::Tee;

/// A boxed, owned, single-pass sequence of items.
pub type Items<T> = Box<dyn Iterator<Item = T>>;

/// Storage strategy for one stage.
///
/// `take` drains the stage into an owned iterator and leaves it empty;
/// `extend` appends. An eager stage materialises whatever it is given, a lazy
/// stage chains it onto its current iterator without pulling anything.
pub trait StageBuffer<T>: Default {
    /// Builds a stage holding `items`.
    fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static;

    /// Drains the stage. An exhausted stage yields an empty sequence.
    fn take(&mut self) -> Items<T>;

    /// Appends `items` to the end of the stage.
    fn extend(&mut self, items: Items<T>);

    /// Removes everything.
    fn clear(&mut self);

    /// Returns an independent copy; later consumption of either side does
    /// not affect the other.
    fn duplicate(&mut self) -> Self;

    /// Counts items without consuming them.
    fn count(&mut self) -> usize;

    /// True for iterator-backed storage.
    fn is_lazy(&self) -> bool;

    /// Copies the current contents out without consuming them.
    fn to_vec(&mut self) -> Vec<T> {
        self.duplicate().take().collect()
    }

    /// Replaces the contents with `items`.
    fn replace(&mut self, items: Items<T>) {
        self.clear();
        self.extend(items);
    }

    /// Consumes the stage into its items.
    fn into_items(mut self) -> Items<T>
    where
        Self: Sized,
    {
        self.take()
    }
}

/// Wraps a whole-sequence computation so it runs on first pull.
///
/// The input is collected only when the returned iterator is first advanced;
/// eager stages pull immediately, lazy stages defer until read.
pub fn deferred<T, I, F>(items: Items<T>, f: F) -> Items<T>
where
    T: 'static,
    I: IntoIterator<Item = T>,
    I::IntoIter: 'static,
    F: FnOnce(Vec<T>) -> I + 'static,
{
    let mut pending = Some((items, f));
    let mut ready: Option<I::IntoIter> = None;
    Box::new(std::iter::from_fn(move || {
        if let Some((items, f)) = pending.take() {
            ready = Some(f(items.collect()).into_iter());
        }
        ready.as_mut()?.next()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_deferred_runs_on_first_pull() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let items: Items<i32> = Box::new(vec![3, 1, 2].into_iter());

        let mut sorted = deferred(items, move |mut all| {
            seen.set(seen.get() + 1);
            all.sort_unstable();
            all
        });

        assert_eq!(calls.get(), 0);
        assert_eq!(sorted.next(), Some(1));
        assert_eq!(sorted.collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_deferred_on_empty_input() {
        let items: Items<i32> = Box::new(std::iter::empty());
        let out: Vec<i32> = deferred(items, |all| all).collect();
        assert!(out.is_empty());
    }
}
