use serde::{Deserialize, Serialize};

/// The `needed` value that marks a submission as urgent. Changes how the
/// notification is presented, never how it is routed.
pub const URGENT_NEEDED: &str = "ASAP";

/// A form submission exactly as posted by the browser.
///
/// Every field is a string and defaults to `""` when the key is absent, so
/// nothing downstream has to distinguish "missing" from "empty". Unknown
/// keys in the body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSubmission {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub service_type: String,
    pub needed: String,
    pub notes: String,
    pub recaptcha_response: String,
    pub timestamp: String,
    pub page_url: String,
    pub page_title: String,
    pub referrer: String,
    pub user_agent: String,
    pub form_source: String,
}

/// Outcome of validating a [`RawSubmission`].
///
/// Holds the ordered, human-readable violation messages; validity is derived
/// from the list being empty, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    errors: Vec<String>,
}

impl ValidationResult {
    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

/// The sanitized, immutable lead record handed to the notification stages.
///
/// Constructed once by [`sanitize`](crate::sanitize); free-text fields are
/// already HTML-escaped and capped, the phone number is formatted, and every
/// field not present in the original input is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSubmission {
    /// Lead id stamped at sanitization, used for log correlation.
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub service_type: String,
    pub needed: String,
    pub notes: String,
    /// RFC 3339; defaults to request-receipt time when the client sent none.
    pub timestamp: String,
    pub page_url: String,
    pub page_title: String,
    pub referrer: String,
    pub user_agent: String,
    /// Socket peer address from the transport layer, never the request body.
    pub client_ip: String,
    pub form_source: String,
}

impl CanonicalSubmission {
    pub fn is_urgent(&self) -> bool {
        self.needed == URGENT_NEEDED
    }
}
