use thiserror::Error;

/// Errors returned by the ionos-processes library.
#[derive(Error, Debug)]
pub enum Error {
    /// The mail service base URL is not configured.
    #[error("no mailer service configured")]
    MissingMailerServiceUrl,

    /// The basic auth user for the mail service is not configured.
    #[error("no mailer user configured")]
    MissingMailerUser,

    /// The basic auth password for the mail service is not configured.
    #[error("no mailer service pass configured")]
    MissingMailerPassword,

    /// An argument passed while building a client was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored configuration value could not be read as the requested type.
    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    /// A host entity (user, file node, route) could not be found.
    #[error("{0}")]
    NotFound(String),

    /// The mail API answered with a non-success status.
    #[error("Mail API returned {status}: {body}")]
    MailApiStatus {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    // ### Converting from other error types ###
    /// Pass-thru [`std::io::Error`].
    #[error("std::io Error: {0}")]
    IOError(#[from] std::io::Error),

    /// Pass-thru `serde_json::Error`.
    #[error("Serde_json Error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[cfg(feature = "parse-cfg")]
    /// Pass-thru `toml::de::Error`.
    #[error("Serde Toml Error: {0}")]
    SerdeTomlError(#[from] toml::de::Error),

    /// Pass-thru `reqwest::Error`.
    #[error("Reqwest Error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    /// Pass-thru `url::ParseError`.
    #[error("Url Parse Error: {0}")]
    UrlParseError(#[from] url::ParseError),
}
