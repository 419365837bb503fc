//! Chain operations.
//!
//! Every operation opens one flow session and writes through the session
//! primitives. Ordering operations (`first`, `last`, `slice`, `reverse`,
//! `sort`) rewrite the whole work stream regardless of mode; `apply`,
//! `expand` and `regroup` dispatch on it.

use super::{modal, Pipeline, Transform};
use crate::core::{Flow, StageName};
use crate::errors::{PipelineError, Result};
use crate::stages::{deferred, StageBuffer};
use std::rc::Rc;

impl<T, S> Pipeline<T, S>
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    /// Runs `op` and writes one item per invocation.
    pub fn apply<X>(&mut self, op: X) -> &mut Self
    where
        X: Transform<T, Output = T> + 'static,
    {
        self.chain(Flow::FourStep, |session| session.apply_one(op))
    }

    /// Runs `op` and writes every element it produces.
    pub fn expand<X, R>(&mut self, op: X) -> &mut Self
    where
        X: Transform<T, Output = R> + 'static,
        R: IntoIterator<Item = T> + 'static,
        R::IntoIter: 'static,
    {
        self.chain(Flow::FourStep, |session| session.apply_many(op))
    }

    /// Runs `op` and collects each invocation's elements into one item.
    pub fn regroup<X, R, U>(&mut self, op: X) -> &mut Self
    where
        X: Transform<T, Output = R> + 'static,
        R: IntoIterator<Item = U>,
        T: FromIterator<U>,
    {
        self.chain(Flow::FourStep, |session| session.apply_iter(op))
    }

    /// Adds items after the source, in place.
    pub fn append<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let items = items.into_iter();
        self.chain(Flow::OneStep, move |session| {
            session.transform(move |current| Box::new(current.chain(items)));
        })
    }

    /// Adds items before the source, in place, keeping their order.
    pub fn prepend<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        let items = items.into_iter();
        self.chain(Flow::OneStep, move |session| {
            session.transform(move |current| Box::new(items.chain(current)));
        })
    }

    /// Runs the tapped operation over every item.
    pub fn map(&mut self) -> Result<&mut Self> {
        let op = self
            .operation
            .clone()
            .ok_or_else(|| PipelineError::missing_operation("map"))?;
        let each = op.clone();
        Ok(self.expand(modal(
            move |all: Vec<T>| all.into_iter().map(|item| op.call(item)).collect::<Vec<_>>(),
            move |item: T| vec![each.call(item)],
        )))
    }

    /// Runs the tapped operation on items matching `predicate` and its
    /// alternate on the rest.
    pub fn either<P>(&mut self, predicate: P) -> Result<&mut Self>
    where
        P: Fn(&T) -> bool + 'static,
    {
        let op = self
            .operation
            .clone()
            .ok_or_else(|| PipelineError::missing_operation("either"))?;
        self.chain(Flow::FourStep, move |session| {
            session.transform(move |items| {
                Box::new(items.map(move |item| {
                    if predicate(&item) {
                        op.call(item)
                    } else {
                        op.call_alternate(item)
                    }
                }))
            });
        });
        Ok(self)
    }

    /// Keeps items matching `predicate`.
    pub fn filter<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        let keep = Rc::new(predicate);
        let each = Rc::clone(&keep);
        self.expand(modal(
            move |all: Vec<T>| all.into_iter().filter(|item| keep(item)).collect::<Vec<_>>(),
            move |item: T| if each(&item) { vec![item] } else { Vec::new() },
        ))
    }

    /// Drops items matching `predicate`.
    pub fn reject<P>(&mut self, predicate: P) -> &mut Self
    where
        P: Fn(&T) -> bool + 'static,
    {
        self.filter(move |item| !predicate(item))
    }

    /// Folds all items into one with `f`. Empty input stays empty.
    pub fn reduce<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T, T) -> T + 'static,
    {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| deferred(items, move |all| all.into_iter().reduce(f)));
        })
    }

    /// Keeps the first `n` items.
    pub fn first(&mut self, n: usize) -> &mut Self {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| Box::new(items.take(n)));
        })
    }

    /// Keeps the last `n` items.
    pub fn last(&mut self, n: usize) -> &mut Self {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| {
                deferred(items, move |mut all| {
                    let start = all.len().saturating_sub(n);
                    all.split_off(start)
                })
            });
        })
    }

    /// Keeps items from `start` up to but excluding `end`.
    pub fn slice(&mut self, start: usize, end: usize) -> &mut Self {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| Box::new(items.skip(start).take(end.saturating_sub(start))));
        })
    }

    /// Reverses the item order.
    pub fn reverse(&mut self) -> &mut Self {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| {
                deferred(items, |mut all| {
                    all.reverse();
                    all
                })
            });
        })
    }

    /// Sorts the items.
    pub fn sort(&mut self) -> &mut Self
    where
        T: Ord,
    {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| {
                deferred(items, |mut all| {
                    all.sort();
                    all
                })
            });
        })
    }

    /// Sorts the items by the key `f` extracts. The sort is stable.
    pub fn sort_by_key<K, F>(&mut self, f: F) -> &mut Self
    where
        K: Ord,
        F: Fn(&T) -> K + 'static,
    {
        self.chain(Flow::FourStep, |session| {
            session.transform(|items| {
                deferred(items, move |mut all| {
                    all.sort_by_key(|item| f(item));
                    all
                })
            });
        })
    }

    /// Moves the first `n` source items straight to the sink. The source is
    /// consumed.
    pub fn shift(&mut self, n: usize) -> &mut Self {
        self.chain(Flow::ThreeStep, |session| {
            session.transform(|items| Box::new(items.take(n)));
        })
    }

    /// Re-reads the last results and writes `f` of each back as the new
    /// source and sink.
    pub fn rework<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(T) -> T + 'static,
    {
        self.chain(Flow::TwoStep, |session| {
            session.transform(|items| Box::new(items.map(f)));
        })
    }

    /// Number of items in the sink.
    pub fn count(&mut self) -> usize {
        self.stages.count(StageName::Sink)
    }

    /// Splits the sink into the items matching `predicate` and the rest.
    pub fn partition<P>(&mut self, predicate: P) -> (Vec<T>, Vec<T>)
    where
        P: Fn(&T) -> bool,
    {
        self.sink().into_iter().partition(|item| predicate(item))
    }
}
