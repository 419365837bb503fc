//! Iterator duplication over one shared buffer.

use super::Items;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

struct TeeBuffer<T> {
    source: Items<T>,
    items: VecDeque<T>,
    /// Absolute position of `items[0]`.
    offset: usize,
    /// Read position of each live branch, by slot.
    cursors: Vec<Option<usize>>,
}

impl<T> TeeBuffer<T> {
    fn live(&self) -> usize {
        self.cursors.iter().flatten().count()
    }

    fn attach(&mut self, position: usize) -> usize {
        if let Some(slot) = self.cursors.iter().position(Option::is_none) {
            self.cursors[slot] = Some(position);
            slot
        } else {
            self.cursors.push(Some(position));
            self.cursors.len() - 1
        }
    }

    /// Drops items every live branch has already read.
    fn trim(&mut self) {
        let end = self.offset + self.items.len();
        let low = self.cursors.iter().flatten().min().copied().unwrap_or(end);
        while self.offset < low && self.items.pop_front().is_some() {
            self.offset += 1;
        }
    }
}

/// One branch of a split iterator.
///
/// Every branch yields the full sequence of the source from the point it was
/// split off. Items are buffered once, shared by all branches, and released
/// when the slowest live branch has read them; if one branch runs far ahead
/// of another the buffer grows without bound. Splitting a branch adds a
/// cursor to the same buffer rather than wrapping it.
pub struct Tee<T> {
    shared: Rc<RefCell<TeeBuffer<T>>>,
    slot: usize,
}

impl<T: Clone> Tee<T> {
    /// Splits `source` into two independent branches.
    #[must_use]
    pub fn split(source: Items<T>) -> (Self, Self) {
        let shared = Rc::new(RefCell::new(TeeBuffer {
            source,
            items: VecDeque::new(),
            offset: 0,
            cursors: vec![Some(0), Some(0)],
        }));
        (
            Self {
                shared: Rc::clone(&shared),
                slot: 0,
            },
            Self { shared, slot: 1 },
        )
    }

    /// Returns a new branch positioned where this one is.
    #[must_use]
    pub fn fork(&self) -> Self {
        let mut buffer = self.shared.borrow_mut();
        let position = buffer.cursors[self.slot].unwrap_or(buffer.offset);
        let slot = buffer.attach(position);
        Self {
            shared: Rc::clone(&self.shared),
            slot,
        }
    }

    /// Number of buffered items this branch has not read yet.
    #[must_use]
    pub fn backlog(&self) -> usize {
        let buffer = self.shared.borrow();
        let end = buffer.offset + buffer.items.len();
        buffer.cursors[self.slot].map_or(0, |position| end - position)
    }
}

impl<T: Clone> Iterator for Tee<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let mut guard = self.shared.borrow_mut();
        let buffer = &mut *guard;
        let position = buffer.cursors[self.slot]?;
        let index = position - buffer.offset;

        let item = if let Some(item) = buffer.items.get(index) {
            item.clone()
        } else {
            let item = buffer.source.next()?;
            if buffer.live() == 1 {
                buffer.offset += 1;
                buffer.cursors[self.slot] = Some(position + 1);
                return Some(item);
            }
            buffer.items.push_back(item.clone());
            item
        };
        buffer.cursors[self.slot] = Some(position + 1);
        buffer.trim();
        Some(item)
    }
}

impl<T> Drop for Tee<T> {
    fn drop(&mut self) {
        if let Ok(mut buffer) = self.shared.try_borrow_mut() {
            buffer.cursors[self.slot] = None;
            buffer.trim();
        }
    }
}

impl<T> fmt::Debug for Tee<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.shared.borrow();
        f.debug_struct("Tee")
            .field("slot", &self.slot)
            .field("branches", &buffer.live())
            .field("buffered", &buffer.items.len())
            .finish()
    }
}
