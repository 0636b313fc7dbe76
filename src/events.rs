//! Domain events and their dispatch to registered listeners.

use crate::host::Share;
use crate::{Error, LIB_LOG_TARGET};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Events the relay can react to.
#[derive(Debug, Clone)]
pub enum Event {
    /// A share was created.
    ShareCreated(ShareCreatedEvent),
    /// A device started wiping its data.
    RemoteWipeStarted(RemoteWipeStarted),
}

/// Discriminant of an [`Event`] used to subscribe listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`Event::ShareCreated`].
    ShareCreated,
    /// See [`Event::RemoteWipeStarted`].
    RemoteWipeStarted,
}

/// Payload of [`Event::ShareCreated`].
#[derive(Debug, Clone)]
pub struct ShareCreatedEvent {
    share: Arc<dyn Share>,
}

/// Payload of [`Event::RemoteWipeStarted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteWipeStarted {
    token: String,
}

/// Reacts to [`Event`]s.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Handle `event`, ignoring events the listener is not interested in.
    async fn handle(&self, event: &Event) -> Result<(), Error>;
}

/// Routes events to the listeners registered for their kind.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    listeners: HashMap<EventKind, Vec<Arc<dyn EventListener>>>,
}

impl Event {
    /// Return the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ShareCreated(_) => EventKind::ShareCreated,
            Event::RemoteWipeStarted(_) => EventKind::RemoteWipeStarted,
        }
    }
}

impl ShareCreatedEvent {
    /// Create a new `ShareCreatedEvent`.
    pub fn new(share: Arc<dyn Share>) -> Self {
        Self { share }
    }

    /// Return the created share.
    pub fn share(&self) -> &dyn Share {
        self.share.as_ref()
    }
}

impl RemoteWipeStarted {
    /// Create a new `RemoteWipeStarted`.
    pub fn new<S: AsRef<str>>(token: S) -> Self {
        Self { token: token.as_ref().into() }
    }

    /// Return the token of the device being wiped.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl From<ShareCreatedEvent> for Event {
    fn from(value: ShareCreatedEvent) -> Self {
        Event::ShareCreated(value)
    }
}

impl From<RemoteWipeStarted> for Event {
    fn from(value: RemoteWipeStarted) -> Self {
        Event::RemoteWipeStarted(value)
    }
}

impl EventDispatcher {
    /// Create an `EventDispatcher` without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to events of `kind`.
    pub fn add_listener(&mut self, kind: EventKind, listener: Arc<dyn EventListener>) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Return whether any listener is subscribed to `kind`.
    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.listeners.get(&kind).is_some_and(|listeners| !listeners.is_empty())
    }

    /// Pass `event` to its listeners in registration order, stopping at the first error.
    pub async fn dispatch(&self, event: &Event) -> Result<(), Error> {
        let Some(listeners) = self.listeners.get(&event.kind()) else {
            trace!(target: LIB_LOG_TARGET, "No listeners for {:?}", event.kind());
            return Ok(());
        };

        for listener in listeners {
            listener.handle(event).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&EventKind, usize> = self.listeners.iter().map(|(kind, list)| (kind, list.len())).collect();
        f.debug_struct("EventDispatcher").field("listeners", &counts).finish()
    }
}
