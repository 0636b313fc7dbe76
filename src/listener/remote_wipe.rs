//! Logging of remote wipes.

use crate::events::{Event, EventListener};
use crate::{Error, LIB_LOG_TARGET};
use async_trait::async_trait;
use tracing::debug;

/// Logs the start of a remote wipe.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteWipeListener;

impl RemoteWipeListener {
    /// Create a new `RemoteWipeListener`.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventListener for RemoteWipeListener {
    async fn handle(&self, event: &Event) -> Result<(), Error> {
        if let Event::RemoteWipeStarted(wipe) = event {
            debug!(target: LIB_LOG_TARGET, "remote wipe started for token: {}", wipe.token());
        }
        Ok(())
    }
}
