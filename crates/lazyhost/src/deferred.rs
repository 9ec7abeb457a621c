//! Memoised, at-most-once construction of expensive values.

use std::fmt;

use once_cell::unsync::OnceCell;

type Factory<T, E> = Box<dyn Fn() -> Result<T, E>>;

/// Builds its value on first use and hands out the cached instance afterwards.
///
/// The factory succeeds at most once over the cell's lifetime. When it fails
/// the error is returned to the caller and the cell stays unforced, so a later
/// [`force`](Self::force) runs the factory again.
///
/// The cell is single-threaded. Forcing it from inside its own factory
/// panics.
pub struct DeferredCell<T, E> {
    factory: Factory<T, E>,
    value: OnceCell<T>,
}

impl<T, E> DeferredCell<T, E> {
    /// Wraps `factory` without running it.
    #[must_use]
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<T, E> + 'static,
    {
        Self {
            factory: Box::new(factory),
            value: OnceCell::new(),
        }
    }

    /// Returns the cached value, building it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns whatever error the factory raises. Nothing is cached in that
    /// case.
    pub fn force(&self) -> Result<&T, E> {
        self.value.get_or_try_init(|| (self.factory)())
    }

    /// Returns the value when the cell has already been forced.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Whether the factory has produced a value.
    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T, E> fmt::Debug for DeferredCell<T, E> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DeferredCell")
            .field("forced", &self.is_forced())
            .finish_non_exhaustive()
    }
}
