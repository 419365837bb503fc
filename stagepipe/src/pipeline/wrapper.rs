//! Output wrappers applied when the sink is read.

use crate::core::Mode;
use crate::errors::{IncompatibleWrapError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

type WrapFn<T> = Rc<dyn Fn(Vec<T>) -> Result<Vec<T>>>;

/// What `drain` and `peek` return.
///
/// A single result collapses to [`Output::Scalar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output<T> {
    /// Exactly one item.
    Scalar(T),
    /// Zero or several items.
    Sequence(Vec<T>),
}

impl<T> Output<T> {
    /// Builds an output, collapsing one-element vectors.
    #[must_use]
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return Self::Scalar(item);
            }
        }
        Self::Sequence(items)
    }

    /// Returns the items as a vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Scalar(item) => vec![item],
            Self::Sequence(items) => items,
        }
    }

    /// Returns the scalar, if this is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&T> {
        match self {
            Self::Scalar(item) => Some(item),
            Self::Sequence(_) => None,
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Sequence(items) => items.len(),
        }
    }

    /// True when there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named conversion applied to sink contents.
///
/// In `One` mode it runs once over the whole sink; in `Many` mode it runs
/// once per item and the results are concatenated.
pub struct Wrapper<T> {
    name: String,
    func: WrapFn<T>,
}

impl<T: 'static> Wrapper<T> {
    /// Creates a wrapper from a fallible conversion.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<T>) -> Result<Vec<T>> + 'static,
    {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    /// The identity wrapper.
    #[must_use]
    pub fn list() -> Self {
        Self::new("list", Ok)
    }

    /// Returns the wrapper name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the conversion to one batch.
    pub fn apply(&self, items: Vec<T>) -> Result<Vec<T>> {
        (self.func)(items)
    }

    /// Applies the conversion according to `mode` and collapses the result.
    pub fn wrap(&self, mode: Mode, items: Vec<T>) -> Result<Output<T>> {
        let wrapped = match mode {
            Mode::One => self.apply(items)?,
            Mode::Many => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.extend(self.apply(vec![item])?);
                }
                out
            }
        };
        Ok(Output::from_vec(wrapped))
    }
}

impl<T: Eq + Hash + Clone + 'static> Wrapper<T> {
    /// Drops repeated items, keeping first occurrences in order.
    #[must_use]
    pub fn set() -> Self {
        Self::new("set", |items: Vec<T>| {
            let mut seen = HashSet::with_capacity(items.len());
            Ok(items
                .into_iter()
                .filter(|item| seen.insert(item.clone()))
                .collect())
        })
    }
}

impl<T: Ord + 'static> Wrapper<T> {
    /// Sorts the items.
    #[must_use]
    pub fn sorted() -> Self {
        Self::new("sorted", |mut items: Vec<T>| {
            items.sort();
            Ok(items)
        })
    }
}

impl Wrapper<Value> {
    /// Builds one JSON object out of `[key, value]` pairs.
    ///
    /// A batch holding a single array of pairs is unpacked first, so the
    /// wrapper works per item in `Many` mode. Anything that is not a pair
    /// fails with `IncompatibleWrap`.
    #[must_use]
    pub fn mapping() -> Self {
        Self::new("mapping", |items: Vec<Value>| {
            let pairs = match items.as_slice() {
                [Value::Array(inner)] if inner.iter().all(Value::is_array) => inner.clone(),
                _ => items,
            };

            let mut object = serde_json::Map::with_capacity(pairs.len());
            for pair in pairs {
                match pair {
                    Value::Array(mut kv) if kv.len() == 2 => {
                        let value = kv.pop().unwrap_or_default();
                        let key = match kv.pop().unwrap_or_default() {
                            Value::String(key) => key,
                            other => other.to_string(),
                        };
                        object.insert(key, value);
                    }
                    other => {
                        return Err(IncompatibleWrapError::new(
                            "mapping",
                            format!("expected a [key, value] pair, got {other}"),
                        )
                        .into());
                    }
                }
            }
            Ok(vec![Value::Object(object)])
        })
    }
}

impl<T> Clone for Wrapper<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Rc::clone(&self.func),
        }
    }
}

impl<T> fmt::Debug for Wrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapper").field("name", &self.name).finish()
    }
}
