//! Notification of email share recipients.

use crate::events::{Event, EventListener};
use crate::host::{L10n, ROUTE_SHOW_SHARE, Share, ShareType, UrlGenerator, UserManager};
use crate::mailer::Mailer;
use crate::notifications::{MailEvent, ShareNotification};
use crate::{Error, LIB_LOG_TARGET};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Notifies recipients of email shares through the mail service.
#[derive(Clone)]
pub struct ShareCreatedEventListener {
    user_manager: Arc<dyn UserManager>,
    l10n: Arc<dyn L10n>,
    url_generator: Arc<dyn UrlGenerator>,
    mailer: Arc<dyn Mailer>,
}

impl ShareCreatedEventListener {
    /// Create a new `ShareCreatedEventListener`.
    pub fn new(
        user_manager: Arc<dyn UserManager>,
        l10n: Arc<dyn L10n>,
        url_generator: Arc<dyn UrlGenerator>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self { user_manager, l10n, url_generator, mailer }
    }

    /// Collect the notification for `share`, or `None` when a lookup failed.
    fn notification(&self, share: &dyn Share) -> Result<Option<ShareNotification>, Error> {
        let Some(user) = self.user_manager.get(share.shared_by()) else {
            error!(target: LIB_LOG_TARGET, "can not find user for share with token '{}'", share.token());
            return Ok(None);
        };

        let file_name = match share.node_name() {
            Ok(name) => name,
            Err(Error::NotFound(detail)) => {
                error!(target: LIB_LOG_TARGET, "can not find node for share with token '{}': {}", share.token(), detail);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let url = match self.url_generator.link_to_route_absolute(ROUTE_SHOW_SHARE, &[("token", share.token())]) {
            Ok(url) => url,
            Err(e) => {
                error!(target: LIB_LOG_TARGET, "can not build link for share with token '{}': {}", share.token(), e);
                return Ok(None);
            }
        };

        let notification = ShareNotification::builder()
            .sender_user_id(user.uid())
            .file_name(file_name)
            .resource_url(url)
            .note(share.note())
            .expiration_date(share.expiration_date().map(unix_timestamp))
            .language(self.l10n.language_code())
            .receiver_email(share.shared_with())
            .build();

        Ok(Some(notification))
    }
}

#[async_trait]
impl EventListener for ShareCreatedEventListener {
    async fn handle(&self, event: &Event) -> Result<(), Error> {
        let Event::ShareCreated(created) = event else {
            return Ok(());
        };

        let share = created.share();
        let share_type = share.share_type();
        if share_type != ShareType::Email {
            debug!(target: LIB_LOG_TARGET, "share type {} ignored", share_type);
            return Ok(());
        }

        if let Some(notification) = self.notification(share)? {
            self.mailer.send(MailEvent::ShareByLink(notification)).await?;
        }
        Ok(())
    }
}

fn unix_timestamp(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
        Err(before) => {
            let before = before.duration();
            let seconds = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
            // floor, so a fraction before the epoch counts as a whole second
            match before.subsec_nanos() {
                0 => -seconds,
                _ => -seconds.saturating_add(1),
            }
        }
    }
}
