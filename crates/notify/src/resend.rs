use std::time::Duration;

use async_trait::async_trait;
use intake::CanonicalSubmission;
use serde::Serialize;
use tracing::debug;

use crate::channel::{ChannelKind, NotifyChannel};
use crate::config::NotifyConfig;
use crate::content::NotificationContent;
use crate::error::NotifyError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// One outbound email in the transactional API's wire shape.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Vec<String>>,
}

/// Thin client for a Resend-shaped transactional email API:
/// `POST {base}/emails` with bearer auth, success is any 2xx.
///
/// Built once per process and cloned where needed; the underlying connection
/// pool is shared across clones.
#[derive(Debug, Clone)]
pub struct EmailApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EmailApiClient {
    pub fn new(config: &NotifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        if self.api_key.is_empty() {
            return Err(NotifyError::Api("email API key not configured".into()));
        }

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|err| NotifyError::Api(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api(format!("HTTP {status}: {body}")));
        }

        debug!(subject = %message.subject, "email accepted by API");
        Ok(())
    }
}

/// Primary delivery channel: the lead notification through the email API,
/// with the submitter's address as Reply-To when they left one.
pub struct EmailApiChannel {
    client: EmailApiClient,
    from: String,
    notification_email: String,
}

impl EmailApiChannel {
    pub fn new(client: EmailApiClient, config: &NotifyConfig) -> Self {
        Self {
            client,
            from: config.sender(),
            notification_email: config.notification_email.clone(),
        }
    }
}

#[async_trait]
impl NotifyChannel for EmailApiChannel {
    fn kind(&self) -> ChannelKind {
        ChannelKind::EmailApi
    }

    async fn send(
        &self,
        submission: &CanonicalSubmission,
        content: &NotificationContent,
    ) -> Result<(), NotifyError> {
        let reply_to = if submission.email.is_empty() {
            None
        } else {
            Some(vec![submission.email.clone()])
        };
        let message = EmailMessage {
            from: self.from.clone(),
            to: vec![self.notification_email.clone()],
            subject: content.subject.clone(),
            html: Some(content.html.clone()),
            text: content.text.clone(),
            reply_to,
        };
        self.client.send(&message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serialization_omits_empty_options() {
        let message = EmailMessage {
            from: "Leadgate <noreply@example.com>".into(),
            to: vec!["office@example.com".into()],
            subject: "New Lead".into(),
            html: None,
            text: "body".into(),
            reply_to: None,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert!(json.get("html").is_none());
        assert!(json.get("reply_to").is_none());
        assert_eq!(json["to"], serde_json::json!(["office@example.com"]));
    }

    #[test]
    fn message_serialization_includes_reply_to() {
        let message = EmailMessage {
            from: "Leadgate <noreply@example.com>".into(),
            to: vec!["office@example.com".into()],
            subject: "New Lead".into(),
            html: Some("<p>hi</p>".into()),
            text: "hi".into(),
            reply_to: Some(vec!["jane@example.com".into()]),
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["reply_to"], serde_json::json!(["jane@example.com"]));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_network() {
        let client = EmailApiClient::new(&NotifyConfig {
            api_base_url: "http://127.0.0.1:9".into(),
            ..NotifyConfig::default()
        });
        let message = EmailMessage {
            from: "a <a@example.com>".into(),
            to: vec!["b@example.com".into()],
            subject: "s".into(),
            html: None,
            text: "t".into(),
            reply_to: None,
        };
        let err = client.send(&message).await.unwrap_err();
        assert!(matches!(err, NotifyError::Api(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = EmailApiClient::new(&NotifyConfig {
            api_base_url: "https://api.resend.com/".into(),
            ..NotifyConfig::default()
        });
        assert_eq!(client.base_url, "https://api.resend.com");
    }
}
