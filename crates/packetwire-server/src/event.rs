use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{Result, ServerError};

/// A peer was accepted.
pub const CONNECTED: &str = "connected";
/// A packet was decoded from a peer.
pub const DATA: &str = "data";
/// A peer's decode loop ended.
pub const DISCONNECTED: &str = "disconnected";

type HandlerFn<E> = dyn Fn(&E) + Send + Sync + 'static;

/// Named events, each with an ordered list of subscribed callbacks.
///
/// Events must be added before handlers can subscribe to or trigger them.
pub struct EventHandler<E> {
    events: RwLock<HashMap<Cow<'static, str>, Vec<Arc<HandlerFn<E>>>>>,
}

impl<E> Default for EventHandler<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventHandler<E> {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
        }
    }

    /// Add an event. Adding an existing event keeps its handlers.
    pub fn add_event(&self, name: impl Into<Cow<'static, str>>) -> Result<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| ServerError::LockPoisoned("event handler"))?;
        events.entry(name.into()).or_default();
        Ok(())
    }

    /// Subscribe `handler` to an existing event.
    pub fn on<F>(&self, name: &str, handler: F) -> Result<()>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut events = self
            .events
            .write()
            .map_err(|_| ServerError::LockPoisoned("event handler"))?;
        events
            .get_mut(name)
            .ok_or_else(|| ServerError::UnknownEvent(name.to_string()))?
            .push(Arc::new(handler));
        Ok(())
    }

    /// Call every handler of `name` with `event`, in subscription order.
    ///
    /// Returns the number of handlers called. Handlers run without the
    /// internal lock held, so they may subscribe further handlers; those
    /// take effect from the next trigger.
    pub fn trigger(&self, name: &str, event: &E) -> Result<usize> {
        let handlers = {
            let events = self
                .events
                .read()
                .map_err(|_| ServerError::LockPoisoned("event handler"))?;
            events
                .get(name)
                .ok_or_else(|| ServerError::UnknownEvent(name.to_string()))?
                .clone()
        };

        for handler in &handlers {
            handler(event);
        }
        Ok(handlers.len())
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.events
            .read()
            .map(|events| events.contains_key(name))
            .unwrap_or(false)
    }

    /// Number of handlers subscribed to `name`.
    pub fn handler_count(&self, name: &str) -> Result<usize> {
        let events = self
            .events
            .read()
            .map_err(|_| ServerError::LockPoisoned("event handler"))?;
        events
            .get(name)
            .map(Vec::len)
            .ok_or_else(|| ServerError::UnknownEvent(name.to_string()))
    }
}
