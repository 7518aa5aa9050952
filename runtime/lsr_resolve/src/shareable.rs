//! Opt-in shared state.
//!
//! A `Shareable<T>` starts private: one owner, no locking, interior
//! mutability through a `RefCell`. [`Shareable::share`] upgrades it in place
//! to `Arc<ReentrantMutex<RefCell<T>>>`; from then on every access goes
//! through the lock and further handles can be created with
//! [`Shareable::try_clone`]. The upgrade is one way.
//!
//! The mutex is reentrant so code running under [`Shareable::synchronize`]
//! can call back into methods that synchronize again. Borrows of the
//! `RefCell` must not be held across such calls.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use parking_lot::ReentrantMutex;

pub enum Shareable<T> {
    Private(RefCell<T>),
    Shared(Arc<ReentrantMutex<RefCell<T>>>),
}

impl<T> Shareable<T> {
    pub fn new(value: T) -> Self {
        Shareable::Private(RefCell::new(value))
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Shareable::Shared(_))
    }

    /// Another handle to the same state. Private state has exactly one
    /// handle, so this returns `None` until [`Shareable::share`] is called.
    pub fn try_clone(&self) -> Option<Self> {
        match self {
            Shareable::Private(_) => None,
            Shareable::Shared(inner) => Some(Shareable::Shared(Arc::clone(inner))),
        }
    }

    /// Run `f` with the state cell, holding the lock when shared.
    pub fn synchronize<R>(&self, f: impl FnOnce(&RefCell<T>) -> R) -> R {
        match self {
            Shareable::Private(cell) => f(cell),
            Shareable::Shared(inner) => {
                let guard = inner.lock();
                f(&guard)
            }
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.synchronize(|cell| f(&cell.borrow()))
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.synchronize(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<T: Default> Shareable<T> {
    /// Upgrade to shared mode, if not already, and return a second handle.
    pub fn share(&mut self) -> Self {
        let inner = match self {
            Shareable::Shared(inner) => Arc::clone(inner),
            Shareable::Private(cell) => {
                let state = std::mem::take(cell.get_mut());
                let inner = Arc::new(ReentrantMutex::new(RefCell::new(state)));
                *self = Shareable::Shared(Arc::clone(&inner));
                tracing::debug!("state upgraded to shared mode");
                inner
            }
        };
        Shareable::Shared(inner)
    }
}

impl<T: Default> Default for Shareable<T> {
    fn default() -> Self {
        Shareable::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shareable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.synchronize(|cell| match cell.try_borrow() {
            Ok(state) if self.is_shared() => write!(f, "Shared({:?})", &*state),
            Ok(state) => write!(f, "Private({:?})", &*state),
            Err(_) => f.write_str("<borrowed>"),
        })
    }
}
