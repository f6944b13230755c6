//! Leadgate Notification Layer
//!
//! Turns a sanitized lead into a business notification and pushes it through
//! an ordered chain of delivery channels:
//!
//! 1. [`EmailApiChannel`] - transactional email API (HTML + text)
//! 2. [`SendmailChannel`] - local sendmail, plain text
//! 3. [`FileQueueChannel`] - durable per-day JSON-lines file
//!
//! Each channel is attempted only after the previous one failed; the first
//! success wins. The chain exists because email delivery crosses an
//! unreliable external boundary - the worst case is a lead sitting in the
//! on-disk queue for manual follow-up, never a lead silently dropped.
//!
//! Urgency (`needed == "ASAP"`) changes the subject prefix and the HTML
//! banner. It never changes routing, ordering, or the number of attempts.
//!
//! Submitters who left an email address get a best-effort confirmation
//! through the API channel only; its failure is logged and ignored.

mod channel;
mod config;
mod content;
mod dispatch;
mod error;
mod fallback;
mod resend;
mod sendmail;

pub use crate::channel::{ChannelKind, DispatchOutcome, NotifyChannel};
pub use crate::config::NotifyConfig;
pub use crate::content::{confirmation, notification, NotificationContent, URGENT_SUBJECT_PREFIX};
pub use crate::dispatch::NotificationDispatcher;
pub use crate::error::NotifyError;
pub use crate::fallback::{FailedSubmissionRecord, FileQueueChannel, MANUAL_PROCESSING_NOTE};
pub use crate::resend::{EmailApiChannel, EmailApiClient, EmailMessage};
pub use crate::sendmail::SendmailChannel;
