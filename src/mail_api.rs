//! Client for the IONOS mail notification API.

use crate::api_client::HttpClient;
use crate::notifications::ShareNotification;
use crate::{Error, LIB_LOG_TARGET};
use async_trait::async_trait;
use tracing::{debug, trace};
use url::Url;

/// Operations offered by the mail notification API, one per notification kind.
#[async_trait]
pub trait EventApi: Send + Sync {
    /// Ask the mail service to notify the recipients of a share by link.
    async fn process_share_by_link_event(&self, brand: &str, message: &ShareNotification) -> Result<(), Error>;
}

/// [`EventApi`] calling the mail service over HTTP.
#[derive(Debug, Clone)]
pub struct EventApiClient {
    client: HttpClient,
    host: Url,
}

impl EventApiClient {
    /// Create a new `EventApiClient` sending to `host`.
    pub fn new(client: HttpClient, host: Url) -> Self {
        Self { client, host }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidArgument(format!("api base url '{}' can not be a base", self.host)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl EventApi for EventApiClient {
    async fn process_share_by_link_event(&self, brand: &str, message: &ShareNotification) -> Result<(), Error> {
        let url = self.endpoint(&["event", brand, "share-by-link"])?;
        trace!(target: LIB_LOG_TARGET, "Mail API Payload: {}", message.to_json());

        let response = self.client.post(url).json(message).send().await?;
        let status = response.status();
        debug!(target: LIB_LOG_TARGET, "Mail API Response - status: {} url: {}", status, response.url());

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::MailApiStatus { status: status.as_u16(), body })
        }
    }
}
