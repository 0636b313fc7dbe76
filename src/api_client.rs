//! Construction of HTTP clients for the mail notification API.

use crate::Error;
use crate::mail_api::{EventApi, EventApiClient};
use reqwest::{Client, IntoUrl, RequestBuilder};
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options applied to every request of an [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    auth: Option<BasicAuth>,
    verify: bool,
    timeout: Duration,
}

/// Static basic auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    user: String,
    password: String,
}

/// A reqwest [`Client`] together with the credentials it sends.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    auth: Option<BasicAuth>,
}

/// Factory for HTTP clients and mail API clients.
pub trait ApiClientService: Send + Sync {
    /// Create a new [`HttpClient`] from `options`.
    fn new_client(&self, options: ClientOptions) -> Result<HttpClient, Error>;

    /// Bind `client` to the mail API at `api_base_url`.
    fn new_event_api(&self, client: HttpClient, api_base_url: &str) -> Result<Box<dyn EventApi>, Error>;
}

/// [`ApiClientService`] building reqwest backed clients.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestClientService;

impl ClientOptions {
    /// Create `ClientOptions` without credentials, with certificate verification on.
    pub fn new() -> Self {
        Self { auth: None, verify: true, timeout: DEFAULT_TIMEOUT }
    }

    /// Send basic auth credentials with every request.
    pub fn basic_auth<S: AsRef<str>>(mut self, user: S, password: S) -> Self {
        self.auth = Some(BasicAuth { user: user.as_ref().into(), password: password.as_ref().into() });
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the timeout for a whole request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Return the credentials, if any.
    pub fn auth(&self) -> Option<&BasicAuth> {
        self.auth.as_ref()
    }

    /// Return whether TLS certificates are verified.
    pub fn verifies_tls(&self) -> bool {
        self.verify
    }

    /// Return the request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicAuth {
    /// Return the user name.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Return the password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth").field("user", &self.user).field("password", &"***").finish()
    }
}

impl HttpClient {
    /// Start a POST request, with credentials attached.
    pub fn post<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        let request = self.client.post(url);
        match &self.auth {
            Some(auth) => request.basic_auth(auth.user(), Some(auth.password())),
            None => request,
        }
    }

    /// Return the credentials, if any.
    pub fn auth(&self) -> Option<&BasicAuth> {
        self.auth.as_ref()
    }
}

impl ApiClientService for ReqwestClientService {
    fn new_client(&self, options: ClientOptions) -> Result<HttpClient, Error> {
        let client = Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(!options.verify)
            .timeout(options.timeout)
            .build()?;
        Ok(HttpClient { client, auth: options.auth })
    }

    fn new_event_api(&self, client: HttpClient, api_base_url: &str) -> Result<Box<dyn EventApi>, Error> {
        Ok(Box::new(EventApiClient::new(client, parse_base_url(api_base_url)?)))
    }
}

fn parse_base_url(api_base_url: &str) -> Result<Url, Error> {
    if api_base_url.is_empty() {
        return Err(Error::InvalidArgument("api base url must not be empty".to_string()));
    }

    let url = Url::parse(api_base_url)
        .map_err(|e| Error::InvalidArgument(format!("invalid api base url '{}': {}", api_base_url, e)))?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidArgument(format!("api base url '{}' can not be a base", api_base_url)));
    }

    Ok(url)
}
