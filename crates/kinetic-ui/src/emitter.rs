use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

/// Minimal event-emission capability, embedded into components rather than
/// inherited by them. Listeners for one key fire in registration order.
pub struct EventEmitter<K, P> {
    listeners: RefCell<IndexMap<K, SmallVec<[Rc<dyn Fn(&P)>; 2]>>>,
}

impl<K: Copy + Eq + Hash, P> EventEmitter<K, P> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(IndexMap::new()),
        }
    }

    pub fn on(&self, key: K, listener: impl Fn(&P) + 'static) {
        self.listeners
            .borrow_mut()
            .entry(key)
            .or_default()
            .push(Rc::new(listener));
    }

    pub fn emit(&self, key: K, payload: &P) {
        let listeners: Vec<Rc<dyn Fn(&P)>> = self
            .listeners
            .borrow()
            .get(&key)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default();
        for listener in listeners {
            listener(payload);
        }
    }
}

impl<K: Copy + Eq + Hash, P> Default for EventEmitter<K, P> {
    fn default() -> Self {
        Self::new()
    }
}
