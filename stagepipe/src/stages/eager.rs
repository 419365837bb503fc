//! Queue-backed stage storage.

use super::{Items, StageBuffer};
use std::collections::VecDeque;

/// A materialised stage.
///
/// Every extend pulls its input to completion, so side effects in
/// operations happen as soon as a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EagerStage<T> {
    items: VecDeque<T>,
}

impl<T> Default for EagerStage<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> EagerStage<T> {
    /// Returns the number of items held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the stage holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Borrows the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T> StageBuffer<T> for EagerStage<T>
where
    T: Clone + 'static,
{
    fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self {
            items: items.into_iter().collect(),
        }
    }

    fn take(&mut self) -> Items<T> {
        Box::new(std::mem::take(&mut self.items).into_iter())
    }

    fn extend(&mut self, items: Items<T>) {
        self.items.extend(items);
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn duplicate(&mut self) -> Self {
        self.clone()
    }

    fn count(&mut self) -> usize {
        self.items.len()
    }

    fn is_lazy(&self) -> bool {
        false
    }

    fn to_vec(&mut self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}
