use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

type Callback<A> = Rc<RefCell<dyn FnMut(&A)>>;

struct Registry<A> {
    next_id: u64,
    callbacks: IndexMap<ListenerId, Callback<A>>,
}

/// Insertion-ordered listener set with synchronous emission.
///
/// `emit` snapshots the callbacks before invoking them, so a callback may
/// subscribe or unsubscribe through a cloned [`ListenerSet`] handle without
/// disturbing the emission in progress. A callback that re-enters an emission
/// of its own set is skipped for the nested call instead of aliasing itself.
pub struct ListenerSet<A> {
    registry: Rc<RefCell<Registry<A>>>,
}

impl<A> Clone for ListenerSet<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<A> Default for ListenerSet<A> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                callbacks: IndexMap::new(),
            })),
        }
    }
}

impl<A> std::fmt::Debug for ListenerSet<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish()
    }
}

impl<A> ListenerSet<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(&A) + 'static) -> ListenerId {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry
            .callbacks
            .insert(id, Rc::new(RefCell::new(callback)));
        id
    }

    /// Returns `true` when the listener was registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.registry
            .borrow_mut()
            .callbacks
            .shift_remove(&id)
            .is_some()
    }

    pub fn clear(&self) {
        self.registry.borrow_mut().callbacks.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn emit(&self, value: &A) {
        let snapshot: SmallVec<[Callback<A>; 4]> =
            self.registry.borrow().callbacks.values().cloned().collect();
        for callback in snapshot {
            if let Ok(mut callback) = callback.try_borrow_mut() {
                (&mut *callback)(value);
            }
        }
    }
}
