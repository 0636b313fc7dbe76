//! Wiring of the mailer and listeners from the host services.

use crate::api_client::{ApiClientService, ReqwestClientService};
use crate::configuration::AppConfig;
use crate::events::{EventDispatcher, EventKind};
use crate::host::{L10n, UrlGenerator, UserManager};
use crate::listener::{RemoteWipeListener, ShareCreatedEventListener};
use crate::mailer::IonosMailerService;
use crate::LIB_LOG_TARGET;
use std::sync::Arc;
use tracing::info;

/// Services the host provides to the application.
#[derive(Clone)]
pub struct HostServices {
    /// Application configuration store.
    pub app_config: Arc<dyn AppConfig>,
    /// User directory.
    pub user_manager: Arc<dyn UserManager>,
    /// Localization of the current request.
    pub l10n: Arc<dyn L10n>,
    /// Link generation.
    pub url_generator: Arc<dyn UrlGenerator>,
}

/// The relay application: one mailer and the listeners using it.
#[derive(Clone)]
pub struct Application {
    share_created: Arc<ShareCreatedEventListener>,
    remote_wipe: Arc<RemoteWipeListener>,
}

impl Application {
    /// Create a new `Application` sending through reqwest clients.
    pub fn new(host: HostServices) -> Self {
        Self::with_api_clients(host, Arc::new(ReqwestClientService))
    }

    /// Create a new `Application` building mail API clients with `api_clients`.
    pub fn with_api_clients(host: HostServices, api_clients: Arc<dyn ApiClientService>) -> Self {
        let mailer = Arc::new(IonosMailerService::new(host.app_config, api_clients));
        let share_created = Arc::new(ShareCreatedEventListener::new(
            host.user_manager,
            host.l10n,
            host.url_generator,
            mailer,
        ));

        Self { share_created, remote_wipe: Arc::new(RemoteWipeListener::new()) }
    }

    /// Subscribe the listeners to their events.
    pub fn register_events(&self, dispatcher: &mut EventDispatcher) {
        dispatcher.add_listener(EventKind::ShareCreated, self.share_created.clone());
        dispatcher.add_listener(EventKind::RemoteWipeStarted, self.remote_wipe.clone());
    }

    /// Create an [`EventDispatcher`] with the listeners registered.
    pub fn boot(&self) -> EventDispatcher {
        let mut dispatcher = EventDispatcher::new();
        self.register_events(&mut dispatcher);
        info!(target: LIB_LOG_TARGET, "Registered share created and remote wipe listeners");
        dispatcher
    }
}
