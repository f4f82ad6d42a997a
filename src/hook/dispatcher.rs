//! Multi-listener event dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use log::trace;

use crate::error_handling::HookError;
use crate::hook::FrontierEvent;

/// Callback attached to a named event.
pub type Listener = Arc<dyn Fn(&FrontierEvent) + Send + Sync>;

/// Handle returned by [`EventDispatcher::add_listener`], used to detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Sink for named frontier events.
///
/// `notify` is called while the frontier holds its operation lock, so
/// implementations must not call back into mutating frontier methods.
pub trait Dispatcher: Send + Sync {
    /// Declares an event name. Registering an existing name is a no-op.
    fn register(&self, name: &str);

    /// Delivers `event` to everything attached under `name`.
    fn notify(&self, name: &str, event: &FrontierEvent);
}

/// Default dispatcher: listeners run synchronously in attachment order.
#[derive(Default)]
pub struct EventDispatcher {
    events: RwLock<HashMap<String, Vec<(ListenerId, Listener)>>>,
    next_id: AtomicU64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `listener` to a registered event.
    pub fn add_listener<F>(&self, name: &str, listener: F) -> Result<ListenerId, HookError>
    where
        F: Fn(&FrontierEvent) + Send + Sync + 'static,
    {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let listeners = events
            .get_mut(name)
            .ok_or_else(|| HookError::UnknownEvent(name.to_string()))?;
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        listeners.push((id, Arc::new(listener)));
        Ok(id)
    }

    /// Detaches a listener. Returns `false` if it was not attached to `name`.
    pub fn remove_listener(&self, name: &str, id: ListenerId) -> bool {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let Some(listeners) = events.get_mut(name) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len)
    }
}

impl Dispatcher for EventDispatcher {
    fn register(&self, name: &str) {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default();
    }

    fn notify(&self, name: &str, event: &FrontierEvent) {
        // Listeners may add or remove listeners; don't hold the lock while calling.
        let listeners: Vec<Listener> = self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(|l| l.iter().map(|(_, f)| Arc::clone(f)).collect())
            .unwrap_or_default();

        trace!("Dispatching {name} to {} listener(s)", listeners.len());
        for listener in listeners {
            listener(event);
        }
    }
}
