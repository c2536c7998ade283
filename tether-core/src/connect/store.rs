//! Store Boundary
//!
//! The runtime binds elements to an *external* observable state container.
//! The [`Store`] trait is the required shape of that collaborator: read the
//! whole state, dispatch an action, and subscribe a change listener.
//!
//! # Subscription Semantics
//!
//! Listeners are notified synchronously, in subscription order, from
//! whatever call changed the state. The runtime never unsubscribes: a
//! connected element stays subscribed for the lifetime of the store.
//!
//! [`MemoryStore`] is the in-crate reference implementation: a reducer-driven
//! store in the Redux mold. It snapshots the listener list before notifying,
//! so a listener may dispatch re-entrantly without deadlocking the store
//! (re-entrant delivery is then the caller's problem, as documented in the
//! connect lifecycle).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use crate::value::Value;

/// A store change listener.
pub type Listener = Arc<dyn Fn() + Send + Sync>;

/// Counter for generating unique subscription IDs.
static SUBSCRIPTION_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identifies one subscription on a store.
///
/// The connect runtime never unsubscribes; the ID exists so that store
/// implementations can offer removal to other callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(SUBSCRIPTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// External observable state container.
pub trait Store: Send + Sync {
    /// Read the current global state.
    fn get_state(&self) -> Value;

    /// Dispatch an action, returning it after the state transition and
    /// listener notification complete.
    fn dispatch(&self, action: Value) -> Value;

    /// Register a change listener, notified on every dispatch.
    fn subscribe(&self, listener: Listener) -> SubscriptionId;
}

/// A stable dispatch handle bound to one store.
///
/// Every projection call receives the same handle, so projections can place
/// dispatching callables into props without capturing the store themselves.
#[derive(Clone)]
pub struct Dispatch {
    store: Arc<dyn Store>,
}

impl Dispatch {
    pub(crate) fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Dispatch an action to the bound store.
    pub fn send(&self, action: Value) -> Value {
        self.store.dispatch(action)
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dispatch(<store>)")
    }
}

/// A state transition function: `(state, action) -> next state`.
pub type Reducer = Box<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Reducer-driven in-memory store.
pub struct MemoryStore {
    state: RwLock<Value>,
    reducer: Reducer,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
}

impl MemoryStore {
    /// Create a store with an initial state and a reducer.
    pub fn new<R>(initial: Value, reducer: R) -> Self
    where
        R: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        Self {
            state: RwLock::new(initial),
            reducer: Box::new(reducer),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Remove a listener. The connect runtime never calls this; it exists
    /// for other store consumers.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners
            .write()
            .expect("listeners lock poisoned")
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Get the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .expect("listeners lock poisoned")
            .len()
    }

    /// Notify all listeners in subscription order.
    ///
    /// Works from a snapshot taken outside the lock so that a listener may
    /// dispatch (and thus re-enter notification) without deadlocking.
    fn notify(&self) {
        let snapshot: Vec<Listener> = {
            let listeners = self.listeners.read().expect("listeners lock poisoned");
            listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        for listener in snapshot {
            (*listener)();
        }
    }
}

impl Store for MemoryStore {
    fn get_state(&self) -> Value {
        self.state.read().expect("state lock poisoned").clone()
    }

    fn dispatch(&self, action: Value) -> Value {
        let next = {
            let state = self.state.read().expect("state lock poisoned");
            (self.reducer)(&state, &action)
        };

        {
            let mut state = self.state.write().expect("state lock poisoned");
            *state = next;
        }

        debug!(action = ?action, "store dispatch");
        self.notify();
        action
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.listeners
            .write()
            .expect("listeners lock poisoned")
            .push((id, listener));
        trace!(subscription = ?id, "store listener registered");
        id
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("state", &self.get_state())
            .field("listener_count", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    fn counter_store() -> MemoryStore {
        MemoryStore::new(Value::object([("count", Value::from(0))]), |state, action| {
            let count = state.get("count").and_then(|v| v.as_f64()).unwrap_or(0.0);
            match action.get("set").and_then(|v| v.as_f64()) {
                Some(n) => Value::object([("count", Value::from(n))]),
                None => Value::object([("count", Value::from(count))]),
            }
        })
    }

    #[test]
    fn dispatch_applies_reducer() {
        let store = counter_store();

        store.dispatch(Value::object([("set", Value::from(5))]));

        assert_eq!(
            store.get_state().get("count").and_then(|v| v.as_f64()),
            Some(5.0)
        );
    }

    #[test]
    fn dispatch_returns_the_action() {
        let store = counter_store();
        let action = Value::object([("set", Value::from(1))]);

        let returned = store.dispatch(action.clone());
        assert!(crate::value::identical(&returned, &action));
    }

    #[test]
    fn listeners_are_notified_in_subscription_order() {
        let store = counter_store();
        let order = Arc::new(RwLock::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store.subscribe(Arc::new(move || {
                order.write().expect("order lock poisoned").push(tag);
            }));
        }

        store.dispatch(Value::object([("set", Value::from(1))]));

        assert_eq!(
            *order.read().expect("order lock poisoned"),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let store = counter_store();
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = Arc::clone(&calls);

        let id = store.subscribe(Arc::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        }));

        store.dispatch(Value::object([("set", Value::from(1))]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.unsubscribe(id);
        store.dispatch(Value::object([("set", Value::from(2))]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_dispatch_reentrantly() {
        let store = Arc::new(counter_store());
        let calls = Arc::new(AtomicI32::new(0));

        let store_clone = Arc::clone(&store);
        let calls_clone = Arc::clone(&calls);
        store.subscribe(Arc::new(move || {
            // Dispatch again from inside notification, exactly once.
            if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                store_clone.dispatch(Value::object([("set", Value::from(9))]));
            }
        }));

        store.dispatch(Value::object([("set", Value::from(1))]));

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            store.get_state().get("count").and_then(|v| v.as_f64()),
            Some(9.0)
        );
    }
}
