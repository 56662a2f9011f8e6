use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Settlement state of a [`Deferred`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredState {
    Pending,
    Resolved,
    Rejected,
}

struct DeferredInner {
    state: Cell<DeferredState>,
    callbacks: RefCell<Vec<Box<dyn FnOnce() + 'static>>>,
}

/// One-shot resolve/reject completion signal.
///
/// `then` callbacks run synchronously on resolve (or immediately when
/// registered after resolution). Rejection drops all registered callbacks: a
/// cancelled animation must never later look finished. Settlement is
/// idempotent; whichever of resolve/reject lands first wins.
#[derive(Clone)]
pub struct Deferred {
    inner: Rc<DeferredInner>,
}

impl Deferred {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(DeferredInner {
                state: Cell::new(DeferredState::Pending),
                callbacks: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> DeferredState {
        self.inner.state.get()
    }

    pub fn is_pending(&self) -> bool {
        self.state() == DeferredState::Pending
    }

    pub fn resolve(&self) {
        if self.inner.state.get() != DeferredState::Pending {
            return;
        }
        self.inner.state.set(DeferredState::Resolved);
        let callbacks = std::mem::take(&mut *self.inner.callbacks.borrow_mut());
        for callback in callbacks {
            callback();
        }
    }

    pub fn reject(&self) {
        if self.inner.state.get() != DeferredState::Pending {
            return;
        }
        self.inner.state.set(DeferredState::Rejected);
        self.inner.callbacks.borrow_mut().clear();
    }

    pub fn then(&self, callback: impl FnOnce() + 'static) {
        match self.inner.state.get() {
            DeferredState::Pending => {
                self.inner.callbacks.borrow_mut().push(Box::new(callback));
            }
            DeferredState::Resolved => callback(),
            DeferredState::Rejected => {}
        }
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn resolve_fires_registered_and_late_callbacks() {
        let deferred = Deferred::new();
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        deferred.then(move || c.set(c.get() + 1));
        assert_eq!(count.get(), 0);

        deferred.resolve();
        assert_eq!(count.get(), 1);

        let c = Rc::clone(&count);
        deferred.then(move || c.set(c.get() + 1));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn reject_drops_callbacks_and_blocks_later_resolve() {
        let deferred = Deferred::new();
        let fired = Rc::new(Cell::new(false));

        let f = Rc::clone(&fired);
        deferred.then(move || f.set(true));

        deferred.reject();
        deferred.resolve();
        assert_eq!(deferred.state(), DeferredState::Rejected);
        assert!(!fired.get());

        let f = Rc::clone(&fired);
        deferred.then(move || f.set(true));
        assert!(!fired.get());
    }
}
