#![warn(missing_docs)]
//! # IONOS Processes
//! A library that listens for file share events and passes share notifications on to the
//! IONOS mail notification service.
//!
//! Events are fed into an [`EventDispatcher`][crate::events::EventDispatcher] created by
//! [`Application::boot`]. Shares created for an email recipient are turned into a
//! [`ShareNotification`][crate::notifications::ShareNotification] and posted to the mail API
//! with the basic auth credentials from the [`AppConfig`][crate::configuration::AppConfig].
//!
//! ```
//! use ionos_processes::configuration::{APP_ID, ConfigValue, MemoryAppConfig};
//! use ionos_processes::events::ShareCreatedEvent;
//! use ionos_processes::host::{FixedL10n, MemoryUserManager, RouteUrlGenerator, ShareRecord, ShareType, User};
//! use ionos_processes::{Application, Error, HostServices};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let app_config = MemoryAppConfig::new();
//!     app_config.set_value(APP_ID, "ionos_mail_base_url", ConfigValue::String("https://mail.example.com".into()));
//!     app_config.set_value(APP_ID, "basic_auth_user", ConfigValue::String("user".into()));
//!     app_config.set_value(APP_ID, "basic_auth_pass", ConfigValue::String("pass".into()));
//!
//!     let users = MemoryUserManager::new();
//!     users.insert(User::new("alice"));
//!
//!     let app = Application::new(HostServices {
//!         app_config: Arc::new(app_config),
//!         user_manager: Arc::new(users),
//!         l10n: Arc::new(FixedL10n::new("en")),
//!         url_generator: Arc::new(RouteUrlGenerator::new("https://cloud.example.com".parse()?)),
//!     });
//!     let dispatcher = app.boot();
//!
//!     let share = ShareRecord::new(ShareType::Email, "alice", "bob@example.com", "AbC123")
//!         .with_node_name("report.pdf");
//!     dispatcher.dispatch(&ShareCreatedEvent::new(Arc::new(share)).into()).await
//! }
//! ```

mod api_client;
mod application;
pub mod configuration;
mod error;
pub mod events;
pub mod host;
pub mod listener;
pub mod mail_api;
pub mod mailer;
pub mod notifications;

pub use self::api_client::{ApiClientService, BasicAuth, ClientOptions, HttpClient, ReqwestClientService};
pub use self::application::{Application, HostServices};
pub use self::error::Error;

/// Logging target value used for the library.
pub const LIB_LOG_TARGET: &str = "ionos_processes";
