//! Dispatch of notifications to the internal mail delivery web service.

use crate::api_client::{ApiClientService, ClientOptions};
use crate::configuration::{AppConfig, MailServiceConfig};
use crate::mail_api::EventApi;
use crate::notifications::{BRAND, MailEvent};
use crate::{Error, LIB_LOG_TARGET};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

/// Something that can deliver a [`MailEvent`].
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `event`.
    ///
    /// Only configuration problems are returned as errors, delivery failures are logged.
    async fn send(&self, event: MailEvent) -> Result<(), Error>;
}

/// [`Mailer`] for the IONOS mail notification service.
///
/// The mail service settings are read from the [`AppConfig`] on every call.
#[derive(Clone)]
pub struct IonosMailerService {
    app_config: Arc<dyn AppConfig>,
    api_clients: Arc<dyn ApiClientService>,
}

impl IonosMailerService {
    /// Create a new `IonosMailerService`.
    pub fn new(app_config: Arc<dyn AppConfig>, api_clients: Arc<dyn ApiClientService>) -> Self {
        Self { app_config, api_clients }
    }

    /// Deliver an event given by name and JSON variables.
    ///
    /// Configuration is validated before the name is looked at, unknown names are then ignored.
    pub async fn send_named(&self, event_name: &str, variables: serde_json::Value) -> Result<(), Error> {
        let api = self.event_api()?;

        match MailEvent::from_name(event_name, variables) {
            Ok(Some(event)) => {
                if let Some(api) = api {
                    deliver(api.as_ref(), &event).await;
                }
            }
            Ok(None) => (),
            Err(e) => error!(target: LIB_LOG_TARGET, "Invalid variables for event {}: {}", event_name, e),
        }

        Ok(())
    }

    /// Validate the settings and build an API client.
    ///
    /// `Ok(None)` means the client could not be built, which is logged and treated as a lost delivery.
    fn event_api(&self) -> Result<Option<Box<dyn EventApi>>, Error> {
        let config = MailServiceConfig::load(self.app_config.as_ref());
        config.validate()?;

        let options = ClientOptions::new()
            .basic_auth(config.auth_user(), config.auth_password())
            .verify(!config.allow_insecure_tls())
            .timeout(config.timeout());

        let api = self
            .api_clients
            .new_client(options)
            .and_then(|client| self.api_clients.new_event_api(client, config.base_url()));

        match api {
            Ok(api) => Ok(Some(api)),
            Err(e) => {
                error!(target: LIB_LOG_TARGET, "Unable to create mail API client: {}", e);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Mailer for IonosMailerService {
    async fn send(&self, event: MailEvent) -> Result<(), Error> {
        if let Some(api) = self.event_api()? {
            deliver(api.as_ref(), &event).await;
        }
        Ok(())
    }
}

async fn deliver(api: &dyn EventApi, event: &MailEvent) {
    debug!(target: LIB_LOG_TARGET, "Sending mail for event {}", event.name());

    let result = match event {
        MailEvent::ShareByLink(notification) => api.process_share_by_link_event(BRAND, notification).await,
    };

    match result {
        Ok(_) => debug!(target: LIB_LOG_TARGET, "Mail for event {} accepted by mail service", event.name()),
        Err(e) => error!(target: LIB_LOG_TARGET, "Exception when calling mail API for event {}: {}", event.name(), e),
    }
}
