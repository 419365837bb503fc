//! Mode-dispatched application of transforms.
//!
//! Operations write their results only through [`Session::apply_one`],
//! [`Session::apply_many`], [`Session::apply_iter`] or the mode-independent
//! [`Session::transform`]. A [`Transform`] carries both a whole-sequence form
//! and a per-item form, and the session picks one from the pipeline's
//! [`Mode`], so individual operations never branch on the mode themselves.

use super::Session;
use crate::core::Mode;
use crate::stages::{deferred, Items, StageBuffer};
use std::marker::PhantomData;

/// A computation with a whole-sequence form and a per-item form.
pub trait Transform<T> {
    /// What one invocation produces.
    type Output;

    /// Called once with every work item (`One` mode).
    fn whole(&self, items: Vec<T>) -> Self::Output;

    /// Called once per work item (`Many` mode).
    fn each(&self, item: T) -> Self::Output;
}

/// A [`Transform`] built from two closures. See [`modal`].
pub struct Modal<W, E, R> {
    whole: W,
    each: E,
    _output: PhantomData<fn() -> R>,
}

/// Pairs a whole-sequence closure with a per-item closure.
pub const fn modal<T, R, W, E>(whole: W, each: E) -> Modal<W, E, R>
where
    W: Fn(Vec<T>) -> R,
    E: Fn(T) -> R,
{
    Modal {
        whole,
        each,
        _output: PhantomData,
    }
}

impl<T, R, W, E> Transform<T> for Modal<W, E, R>
where
    W: Fn(Vec<T>) -> R,
    E: Fn(T) -> R,
{
    type Output = R;

    fn whole(&self, items: Vec<T>) -> R {
        (self.whole)(items)
    }

    fn each(&self, item: T) -> R {
        (self.each)(item)
    }
}

impl<T, S> Session<'_, T, S>
where
    T: Clone + 'static,
    S: StageBuffer<T>,
{
    /// Writes one item per invocation.
    ///
    /// `One`: a single call over all of work, one item written.
    /// `Many`: one call per item, each result written.
    pub fn apply_one<X>(&mut self, op: X)
    where
        X: Transform<T, Output = T> + 'static,
    {
        let mode = self.mode();
        self.transform(move |items: Items<T>| -> Items<T> {
            match mode {
                Mode::One => deferred(items, move |all| std::iter::once(op.whole(all))),
                Mode::Many => Box::new(items.map(move |item| op.each(item))),
            }
        });
    }

    /// Writes every element of every invocation's result.
    ///
    /// `One`: a single call over all of work, its elements written.
    /// `Many`: one call per item, the results concatenated.
    pub fn apply_many<X, R>(&mut self, op: X)
    where
        X: Transform<T, Output = R> + 'static,
        R: IntoIterator<Item = T> + 'static,
        R::IntoIter: 'static,
    {
        let mode = self.mode();
        self.transform(move |items: Items<T>| -> Items<T> {
            match mode {
                Mode::One => deferred(items, move |all| op.whole(all)),
                Mode::Many => Box::new(items.flat_map(move |item| op.each(item))),
            }
        });
    }

    /// Like [`Session::apply_many`], but each invocation's elements are
    /// regrouped into a single item so per-item grouping survives.
    pub fn apply_iter<X, R, U>(&mut self, op: X)
    where
        X: Transform<T, Output = R> + 'static,
        R: IntoIterator<Item = U>,
        T: FromIterator<U>,
    {
        let mode = self.mode();
        self.transform(move |items: Items<T>| -> Items<T> {
            match mode {
                Mode::One => deferred(items, move |all| {
                    std::iter::once(op.whole(all).into_iter().collect::<T>())
                }),
                Mode::Many => {
                    Box::new(items.map(move |item| op.each(item).into_iter().collect::<T>()))
                }
            }
        });
    }
}
