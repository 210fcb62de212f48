//! Typed Event Dispatcher
//!
//! A small publish/subscribe container keyed by event kind. Every event type
//! declares its closed set of kinds through [`Event`], so a listener is
//! always registered against a kind the payload enum actually knows about.
//!
//! Like a browser `EventTarget`/Node emitter, the dispatcher announces its own
//! bookkeeping: a `newListener` event is raised before a listener is
//! inserted, and a `removeListener` event after one is removed.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// An event payload with a closed set of kinds
pub trait Event: Debug + Send + Sync + 'static {
    type Kind: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// The kind this payload is dispatched under
    fn kind(&self) -> Self::Kind;

    /// Payload announcing that a listener for `kind` is about to be added
    fn new_listener(kind: Self::Kind) -> Self;

    /// Payload announcing that a listener for `kind` was removed
    fn remove_listener(kind: Self::Kind) -> Self;
}

/// Callback registered with an [`EventDispatcher`]
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handle identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registry<E: Event> {
    next_id: u64,
    listeners: HashMap<E::Kind, Vec<(ListenerId, Listener<E>)>>,
}

/// Listener registry and dispatcher for one event type
pub struct EventDispatcher<E: Event> {
    registry: Mutex<Registry<E>>,
}

impl<E: Event> Default for EventDispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> EventDispatcher<E> {
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_id: 0,
                listeners: HashMap::new(),
            }),
        }
    }

    // Listeners never run under the lock, so a poisoned registry still holds
    // consistent data.
    fn registry(&self) -> MutexGuard<'_, Registry<E>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `listener` for `kind`, announcing it with `newListener` first
    pub fn add_listener(&self, kind: E::Kind, listener: Listener<E>) -> ListenerId {
        self.dispatch(&E::new_listener(kind));

        let mut registry = self.registry();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry
            .listeners
            .entry(kind)
            .or_default()
            .push((id, listener));
        trace!("Added listener {:?} for {:?}", id, kind);
        id
    }

    /// Remove one listener. Returns `false` if `id` was not registered for `kind`.
    pub fn remove_listener(&self, kind: E::Kind, id: ListenerId) -> bool {
        let removed = {
            let mut registry = self.registry();
            match registry.listeners.get_mut(&kind) {
                Some(entries) => {
                    let before = entries.len();
                    entries.retain(|(entry_id, _)| *entry_id != id);
                    let removed = entries.len() != before;
                    if entries.is_empty() {
                        registry.listeners.remove(&kind);
                    }
                    removed
                }
                None => false,
            }
        };

        if removed {
            trace!("Removed listener {:?} for {:?}", id, kind);
            self.dispatch(&E::remove_listener(kind));
        }
        removed
    }

    /// Remove every listener for `kind`, announcing each removal.
    /// Returns how many were removed.
    pub fn remove_all_listeners(&self, kind: E::Kind) -> usize {
        let removed = self
            .registry()
            .listeners
            .remove(&kind)
            .map(|entries| entries.len())
            .unwrap_or(0);

        for _ in 0..removed {
            self.dispatch(&E::remove_listener(kind));
        }
        removed
    }

    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.registry()
            .listeners
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Invoke every listener for the event's kind in registration order.
    /// Returns `false` if nobody was listening.
    pub fn dispatch(&self, event: &E) -> bool {
        let listeners: Vec<Listener<E>> = match self.registry().listeners.get(&event.kind()) {
            Some(entries) => entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
            None => return false,
        };

        for listener in &listeners {
            listener(event);
        }
        true
    }
}
