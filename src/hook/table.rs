//! Single-slot override hooks.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::debug;

use crate::error_handling::HookError;
use crate::hook::FrontierEvent;

/// Override callback for one named event.
pub trait Hook: Send + Sync {
    /// Called when the hook is being attached to `event`.
    ///
    /// Returning an error declines the attachment and leaves the slot empty.
    fn on_attach(&self, _event: &str) -> Result<(), HookError> {
        Ok(())
    }

    fn call(&self, event: &FrontierEvent);
}

impl<F> Hook for F
where
    F: Fn(&FrontierEvent) + Send + Sync,
{
    fn call(&self, event: &FrontierEvent) {
        self(event)
    }
}

/// Event name -> optional hook. Only declared names accept hooks.
#[derive(Default)]
pub struct HookTable {
    slots: RwLock<HashMap<String, Option<Arc<dyn Hook>>>>,
}

impl HookTable {
    /// Table with an empty slot for each name.
    pub fn with_events(names: &[&str]) -> Self {
        let slots = names.iter().map(|n| (n.to_string(), None)).collect();
        Self {
            slots: RwLock::new(slots),
        }
    }

    /// Connects `hook` to the empty slot for `name`.
    ///
    /// `on_attach` runs with no lock held, so it may use the table itself.
    /// The slot is re-checked afterwards.
    pub fn attach(&self, name: &str, hook: Arc<dyn Hook>) -> Result<(), HookError> {
        Self::check_vacant(&self.slots.read().unwrap_or_else(PoisonError::into_inner), name)?;

        hook.on_attach(name).map_err(|e| {
            debug!("Hook declined attachment to {name}: {e}");
            HookError::Disconnected(name.to_string())
        })?;

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Self::check_vacant(&slots, name)?;
        slots.insert(name.to_string(), Some(hook));
        Ok(())
    }

    fn check_vacant(
        slots: &HashMap<String, Option<Arc<dyn Hook>>>,
        name: &str,
    ) -> Result<(), HookError> {
        match slots.get(name) {
            None => Err(HookError::UnknownEvent(name.to_string())),
            Some(Some(_)) => Err(HookError::AlreadyConnected(name.to_string())),
            Some(None) => Ok(()),
        }
    }

    /// Empties the slot, returning the detached hook.
    pub fn detach(&self, name: &str) -> Option<Arc<dyn Hook>> {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(name)
            .and_then(Option::take)
    }

    pub fn is_connected(&self, name: &str) -> bool {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .is_some_and(Option::is_some)
    }

    /// Runs the hook attached under the event's name, if any.
    ///
    /// Returns whether a hook ran.
    pub fn call(&self, event: &FrontierEvent) -> bool {
        let hook = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event.name())
            .cloned()
            .flatten();
        match hook {
            Some(hook) => {
                hook.call(event);
                true
            }
            None => false,
        }
    }
}
