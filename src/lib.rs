//! Workspace umbrella crate for the leadgate lead-capture pipeline.
//!
//! This crate stitches together intake validation/sanitization, captcha
//! verification, and notification dispatch so the HTTP layer can process a
//! submission through a single entry point: [`process_submission`].
//!
//! The stages run strictly in order - validate, verify, sanitize, dispatch -
//! and the first failing stage short-circuits with a typed
//! [`PipelineError`]. Only the dispatcher has internal fallback; the
//! pipeline itself never retries.

pub use captcha::{Environment, RecaptchaVerifier};
pub use intake::{
    digits, escape_html, format_phone, sanitize, validate, CanonicalSubmission, RawSubmission,
    ValidationResult, URGENT_NEEDED,
};
pub use notify::{
    ChannelKind, DispatchOutcome, FailedSubmissionRecord, NotificationDispatcher, NotifyConfig,
    NotifyError,
};

use std::time::Instant;

use tracing::{info, warn};

/// Errors that can occur while processing a submission through the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The submission failed field validation; carries one message per
    /// violation, in evaluation order.
    #[error("submission failed validation")]
    Invalid(Vec<String>),

    /// The captcha provider rejected the token (or was unreachable).
    #[error("captcha verification rejected the submission")]
    CaptchaRejected,

    /// Every notification channel failed, durable queue included.
    #[error("notification delivery failed: {0}")]
    Delivery(#[from] NotifyError),
}

/// Run one raw submission through the full pipeline.
///
/// `client_ip` must be the transport-layer peer address. On success returns
/// the canonical record together with the channel that delivered it.
pub async fn process_submission(
    raw: &RawSubmission,
    client_ip: &str,
    verifier: &RecaptchaVerifier,
    dispatcher: &NotificationDispatcher,
) -> Result<(CanonicalSubmission, DispatchOutcome), PipelineError> {
    let start = Instant::now();

    let validation = validate(raw);
    if !validation.is_valid() {
        let elapsed_micros = start.elapsed().as_micros();
        warn!(errors = ?validation.errors(), elapsed_micros, "submission_invalid");
        return Err(PipelineError::Invalid(validation.into_errors()));
    }

    if !verifier.verify(&raw.recaptcha_response, client_ip).await {
        let elapsed_micros = start.elapsed().as_micros();
        warn!(elapsed_micros, "submission_captcha_rejected");
        return Err(PipelineError::CaptchaRejected);
    }

    let submission = sanitize(raw, client_ip);
    let outcome = dispatcher.dispatch(&submission).await?;

    let elapsed_micros = start.elapsed().as_micros();
    info!(
        id = %submission.id,
        channel = %outcome.channel,
        urgent = submission.is_urgent(),
        elapsed_micros,
        "submission_processed"
    );
    Ok((submission, outcome))
}
