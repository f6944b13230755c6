/// Notification failures. Individual channel errors are expected outcomes
/// that the dispatcher logs and steps past; only [`AllChannelsFailed`]
/// escapes to the caller.
///
/// [`AllChannelsFailed`]: NotifyError::AllChannelsFailed
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("email API error: {0}")]
    Api(String),

    #[error("sendmail error: {0}")]
    Sendmail(String),

    #[error("fallback queue error: {0}")]
    Queue(String),

    #[error("all notification channels failed")]
    AllChannelsFailed,
}
