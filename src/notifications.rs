//! Payloads sent to the mail notification service.

use crate::Error;
use serde::{Deserialize, Serialize};

/// Brand the mail service renders notifications for.
pub const BRAND: &str = "IONOS";

/// Event name of a [`MailEvent::ShareByLink`].
pub const EVENT_NAME_SHARE_BY_LINK: &str = "share-by-link";

/// Data for the mail sent when a file is shared by email link.
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Hash, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ShareNotification {
    sender_user_id: String,
    file_name: String,
    resource_url: String,
    note: Option<String>,
    expiration_date: Option<i64>,
    language: String,
    receiver_emails: Vec<String>,
}

/// Notifications the mail service knows how to deliver.
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum MailEvent {
    /// A file was shared with an email recipient.
    ShareByLink(ShareNotification),
}

/// Builder for [`ShareNotification`].
#[derive(Debug, Default, Clone)]
pub struct ShareNotificationBuilder {
    sender_user_id: String,
    file_name: String,
    resource_url: String,
    note: Option<String>,
    expiration_date: Option<i64>,
    language: String,
    receiver_emails: Vec<String>,
}

impl ShareNotification {
    /// Start building a `ShareNotification`.
    pub fn builder() -> ShareNotificationBuilder {
        ShareNotificationBuilder::default()
    }

    /// Return the id of the user who created the share.
    pub fn sender_user_id(&self) -> &str {
        &self.sender_user_id
    }

    /// Return the name of the shared file or folder.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Return the public link to the share.
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    /// Return the note attached to the share.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Return the expiration as a unix timestamp in seconds.
    pub fn expiration_date(&self) -> Option<i64> {
        self.expiration_date
    }

    /// Return the language code the mail should be written in.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Return the recipients.
    pub fn receiver_emails(&self) -> &[String] {
        &self.receiver_emails
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl ShareNotificationBuilder {
    /// Set the id of the sending user.
    pub fn sender_user_id<S: AsRef<str>>(mut self, value: S) -> Self {
        self.sender_user_id = value.as_ref().into();
        self
    }

    /// Set the file name.
    pub fn file_name<S: AsRef<str>>(mut self, value: S) -> Self {
        self.file_name = value.as_ref().into();
        self
    }

    /// Set the public link.
    pub fn resource_url<S: AsRef<str>>(mut self, value: S) -> Self {
        self.resource_url = value.as_ref().into();
        self
    }

    /// Set the share note.
    pub fn note(mut self, value: Option<&str>) -> Self {
        self.note = value.map(String::from);
        self
    }

    /// Set the expiration timestamp.
    pub fn expiration_date(mut self, value: Option<i64>) -> Self {
        self.expiration_date = value;
        self
    }

    /// Set the language code.
    pub fn language<S: AsRef<str>>(mut self, value: S) -> Self {
        self.language = value.as_ref().into();
        self
    }

    /// Add a recipient.
    pub fn receiver_email<S: AsRef<str>>(mut self, value: S) -> Self {
        self.receiver_emails.push(value.as_ref().into());
        self
    }

    /// Finish the `ShareNotification`.
    pub fn build(self) -> ShareNotification {
        ShareNotification {
            sender_user_id: self.sender_user_id,
            file_name: self.file_name,
            resource_url: self.resource_url,
            note: self.note,
            expiration_date: self.expiration_date,
            language: self.language,
            receiver_emails: self.receiver_emails,
        }
    }
}

impl MailEvent {
    /// Parse an event from its name and JSON variables.
    ///
    /// Returns `Ok(None)` for names the mail service does not know.
    pub fn from_name<S: AsRef<str>>(name: S, variables: serde_json::Value) -> Result<Option<MailEvent>, Error> {
        match name.as_ref() {
            EVENT_NAME_SHARE_BY_LINK => Ok(Some(MailEvent::ShareByLink(serde_json::from_value(variables)?))),
            _ => Ok(None),
        }
    }

    /// Return the event name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            MailEvent::ShareByLink(_) => EVENT_NAME_SHARE_BY_LINK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(expiration_date: Option<i64>) -> ShareNotification {
        ShareNotification::builder()
            .sender_user_id("123e4567-e89b-12d3-a456-426614174000")
            .file_name("report.pdf")
            .resource_url("https://cloud.example.com/s/mock-token")
            .note(Some("have a look"))
            .expiration_date(expiration_date)
            .language("de")
            .receiver_email("someone@example.com")
            .build()
    }

    #[test]
    fn serializes_camel_case_fields() {
        let value = serde_json::to_value(notification(Some(123456789))).unwrap();
        assert_eq!(
            value,
            json!({
                "senderUserId": "123e4567-e89b-12d3-a456-426614174000",
                "fileName": "report.pdf",
                "resourceUrl": "https://cloud.example.com/s/mock-token",
                "note": "have a look",
                "expirationDate": 123456789,
                "language": "de",
                "receiverEmails": ["someone@example.com"],
            })
        );
    }

    #[test]
    fn missing_expiration_is_null() {
        let value = serde_json::to_value(notification(None)).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("expirationDate"));
        assert!(object["expirationDate"].is_null());
    }

    #[test]
    fn from_name_share_by_link() {
        let variables = serde_json::to_value(notification(None)).unwrap();
        let event = MailEvent::from_name(EVENT_NAME_SHARE_BY_LINK, variables).unwrap();
        assert_eq!(event, Some(MailEvent::ShareByLink(notification(None))));
        assert_eq!(event.unwrap().name(), "share-by-link");
    }

    #[test]
    fn from_name_unknown_event() {
        let event = MailEvent::from_name("password-reset", json!({"key": "value"})).unwrap();
        assert!(event.is_none());
    }

    #[test]
    fn from_name_bad_variables() {
        let event = MailEvent::from_name(EVENT_NAME_SHARE_BY_LINK, json!({"key": "value"}));
        assert!(matches!(event, Err(Error::SerdeJsonError(_))));
    }
}
