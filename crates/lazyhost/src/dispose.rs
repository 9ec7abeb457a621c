//! Releasable resources and their aggregation.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::mem;

/// A resource that can be released once.
///
/// Implementations must tolerate repeated calls; only the first one has an
/// effect.
pub trait Disposable {
    /// Releases the resource.
    fn dispose(&mut self);
}

/// Runs a closure the first time it is disposed.
pub struct OnDispose<F>
where
    F: FnOnce(),
{
    release: Option<F>,
}

impl<F> Disposable for OnDispose<F>
where
    F: FnOnce(),
{
    fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Wraps `release` into a boxed [`Disposable`].
#[must_use]
pub fn on_dispose<F>(release: F) -> Box<dyn Disposable>
where
    F: FnOnce() + 'static,
{
    Box::new(OnDispose {
        release: Some(release),
    })
}

/// Owns a list of resources and releases them together.
///
/// Resources are released in registration order. Releasing twice is a no-op,
/// and resources pushed after release are released straight away.
#[derive(Default)]
pub struct DisposableAggregate {
    items: RefCell<Vec<Box<dyn Disposable>>>,
    disposed: Cell<bool>,
}

impl DisposableAggregate {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `item`.
    pub fn push(&self, mut item: Box<dyn Disposable>) {
        if self.disposed.get() {
            item.dispose();
            return;
        }
        self.items.borrow_mut().push(item);
    }

    /// Releases every owned resource.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        // Taken out first so releases may push into the aggregate again.
        let items = mem::take(&mut *self.items.borrow_mut());
        for mut item in items {
            item.dispose();
        }
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Number of resources still owned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Returns `true` when nothing is owned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Disposable for DisposableAggregate {
    fn dispose(&mut self) {
        Self::dispose(self);
    }
}

impl fmt::Debug for DisposableAggregate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("DisposableAggregate")
            .field("items", &self.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
