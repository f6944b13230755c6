use async_trait::async_trait;
use intake::CanonicalSubmission;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Message, SendmailTransport, Transport};

use crate::channel::{ChannelKind, NotifyChannel};
use crate::config::NotifyConfig;
use crate::content::NotificationContent;
use crate::error::NotifyError;

/// Secondary delivery channel: the platform sendmail binary, plain-text body
/// with From/Reply-To headers only. Sendmail hands the message to the local
/// MTA synchronously, so the send runs on the blocking pool.
pub struct SendmailChannel {
    from: String,
    to: String,
}

impl SendmailChannel {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            from: config.sender(),
            to: config.notification_email.clone(),
        }
    }

    fn build_message(&self, content: &NotificationContent) -> Result<Message, NotifyError> {
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|err| NotifyError::Sendmail(format!("bad from address: {err}")))?;
        let to: Mailbox = self
            .to
            .parse()
            .map_err(|err| NotifyError::Sendmail(format!("bad to address: {err}")))?;

        Message::builder()
            .from(from.clone())
            .reply_to(from)
            .to(to)
            .subject(&content.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(content.text.clone())
            .map_err(|err| NotifyError::Sendmail(format!("message build failed: {err}")))
    }
}

#[async_trait]
impl NotifyChannel for SendmailChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Sendmail
    }

    async fn send(
        &self,
        _submission: &CanonicalSubmission,
        content: &NotificationContent,
    ) -> Result<(), NotifyError> {
        let message = self.build_message(content)?;
        tokio::task::spawn_blocking(move || {
            SendmailTransport::new()
                .send(&message)
                .map_err(|err| NotifyError::Sendmail(err.to_string()))
        })
        .await
        .map_err(|err| NotifyError::Sendmail(format!("send task failed: {err}")))?
    }
}
