use intake::CanonicalSubmission;
use tracing::{info, warn};

use crate::channel::{DispatchOutcome, NotifyChannel};
use crate::config::NotifyConfig;
use crate::content;
use crate::error::NotifyError;
use crate::fallback::FileQueueChannel;
use crate::resend::{EmailApiChannel, EmailApiClient, EmailMessage};
use crate::sendmail::SendmailChannel;

/// Drives a lead notification through the ordered channel chain.
///
/// Content is composed once and shared by every attempt; each channel is
/// tried only after the previous one failed, and the first success wins.
/// The same submission travels through the whole chain, so whatever the
/// durable queue records is exactly what the earlier channels tried to send.
pub struct NotificationDispatcher {
    config: NotifyConfig,
    channels: Vec<Box<dyn NotifyChannel>>,
    /// Confirmation sender. Absent when the dispatcher was assembled from
    /// bare channels, which also disables confirmations.
    api: Option<EmailApiClient>,
}

impl NotificationDispatcher {
    /// Assemble the production chain: email API, then sendmail, then the
    /// durable file queue.
    pub fn new(config: NotifyConfig) -> Self {
        let api = EmailApiClient::new(&config);
        let channels: Vec<Box<dyn NotifyChannel>> = vec![
            Box::new(EmailApiChannel::new(api.clone(), &config)),
            Box::new(SendmailChannel::new(&config)),
            Box::new(FileQueueChannel::new(config.fallback_dir.clone())),
        ];
        Self {
            config,
            channels,
            api: Some(api),
        }
    }

    /// Assemble a dispatcher from an explicit channel list. No confirmation
    /// emails are sent.
    pub fn with_channels(config: NotifyConfig, channels: Vec<Box<dyn NotifyChannel>>) -> Self {
        Self {
            config,
            channels,
            api: None,
        }
    }

    /// Attempt delivery through the chain. `Err(AllChannelsFailed)` means
    /// even the durable queue could not record the lead.
    pub async fn dispatch(
        &self,
        submission: &CanonicalSubmission,
    ) -> Result<DispatchOutcome, NotifyError> {
        let content = content::notification(submission, &self.config);

        let mut outcome = None;
        for channel in &self.channels {
            match channel.send(submission, &content).await {
                Ok(()) => {
                    info!(
                        id = %submission.id,
                        channel = %channel.kind(),
                        urgent = submission.is_urgent(),
                        "lead notification delivered"
                    );
                    outcome = Some(DispatchOutcome {
                        delivered: true,
                        channel: channel.kind(),
                    });
                    break;
                }
                Err(err) => {
                    warn!(
                        id = %submission.id,
                        channel = %channel.kind(),
                        error = %err,
                        "notification channel failed"
                    );
                }
            }
        }
        let outcome = outcome.ok_or(NotifyError::AllChannelsFailed)?;

        // Courtesy copy to the submitter, API channel only, after the lead
        // notification has been resolved.
        self.send_confirmation(submission).await;

        Ok(outcome)
    }

    async fn send_confirmation(&self, submission: &CanonicalSubmission) {
        if submission.email.is_empty() {
            return;
        }
        let Some(api) = &self.api else {
            return;
        };

        let content = content::confirmation(submission, &self.config);
        let message = EmailMessage {
            from: self.config.sender(),
            to: vec![submission.email.clone()],
            subject: content.subject,
            html: Some(content.html),
            text: content.text,
            reply_to: None,
        };
        if let Err(err) = api.send(&message).await {
            warn!(id = %submission.id, error = %err, "submitter confirmation not sent");
        }
    }
}
