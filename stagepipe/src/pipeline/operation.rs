//! Tapped operations.

use std::fmt;
use std::rc::Rc;

/// A shared item-level callable.
pub type Callable<T> = Rc<dyn Fn(T) -> T>;

/// The callable chain operations read after a `tap`.
///
/// Arguments are bound by capturing them in the closure. The optional
/// alternate is used by conditional operations for items that do not match.
pub struct Operation<T> {
    name: String,
    call: Callable<T>,
    alternate: Option<Callable<T>>,
}

impl<T> Operation<T> {
    /// Creates an anonymous operation.
    pub fn new<F>(call: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        Self::named("anonymous", call)
    }

    /// Creates a named operation.
    pub fn named<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        Self {
            name: name.into(),
            call: Rc::new(call),
            alternate: None,
        }
    }

    /// Sets the alternate callable.
    #[must_use]
    pub fn otherwise<F>(mut self, alternate: F) -> Self
    where
        F: Fn(T) -> T + 'static,
    {
        self.alternate = Some(Rc::new(alternate));
        self
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if an alternate is set.
    #[must_use]
    pub const fn has_alternate(&self) -> bool {
        self.alternate.is_some()
    }

    /// Runs the primary callable.
    pub fn call(&self, item: T) -> T {
        (self.call)(item)
    }

    /// Runs the alternate callable, or returns the item unchanged.
    pub fn call_alternate(&self, item: T) -> T {
        match &self.alternate {
            Some(alternate) => alternate(item),
            None => item,
        }
    }
}

impl<T> Clone for Operation<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            call: Rc::clone(&self.call),
            alternate: self.alternate.clone(),
        }
    }
}

impl<T> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("has_alternate", &self.has_alternate())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_arguments_are_captured() {
        let offset = 10;
        let op = Operation::named("add", move |x: i32| x + offset);

        assert_eq!(op.name(), "add");
        assert_eq!(op.call(5), 15);
    }

    #[test]
    fn test_alternate_defaults_to_identity() {
        let op = Operation::new(|x: i32| x * 2);
        assert!(!op.has_alternate());
        assert_eq!(op.call_alternate(7), 7);

        let op = op.otherwise(|x| -x);
        assert_eq!(op.call_alternate(7), -7);
        assert_eq!(op.clone().call(7), 14);
    }
}
