use std::fmt;

use async_trait::async_trait;
use intake::CanonicalSubmission;
use serde::{Deserialize, Serialize};

use crate::content::NotificationContent;
use crate::error::NotifyError;

/// Which delivery channel handled (or attempted) a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    EmailApi,
    Sendmail,
    FileQueue,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::EmailApi => "email_api",
            ChannelKind::Sendmail => "sendmail",
            ChannelKind::FileQueue => "file_queue",
        };
        f.write_str(name)
    }
}

/// Result of a dispatch: whether the lead reached the business and through
/// which channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub delivered: bool,
    pub channel: ChannelKind,
}

/// One delivery channel in the dispatcher's ordered chain.
///
/// A channel returns `Err` for any failure it can observe - transport
/// errors, non-success responses, disk faults. The dispatcher treats that as
/// "try the next channel", not as an exception.
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    fn kind(&self) -> ChannelKind;

    async fn send(
        &self,
        submission: &CanonicalSubmission,
        content: &NotificationContent,
    ) -> Result<(), NotifyError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_kind_display_matches_serde() {
        for kind in [
            ChannelKind::EmailApi,
            ChannelKind::Sendmail,
            ChannelKind::FileQueue,
        ] {
            let as_json = serde_json::to_string(&kind).unwrap();
            assert_eq!(as_json, format!("\"{kind}\""));
        }
    }
}
