//! Leadgate Intake Layer
//!
//! This is where a form submission enters the pipeline. We take the raw
//! key/value body the browser posted, check it against the form's field
//! rules, and turn it into a canonical record the notification stages can
//! render without ever touching unescaped input again.
//!
//! ## What we do here
//!
//! - **Validate** - Required-field presence, name/phone/email/address shape
//!   checks. All violations are collected, not short-circuited, so the
//!   caller can show the submitter every problem at once.
//! - **Sanitize** - Trim, cap, and HTML-escape every free-text field exactly
//!   once. Downstream templates interpolate these values verbatim.
//! - **Normalize the phone number** - Ten digits become `(AAA) BBB-CCCC`.
//! - **Stamp provenance** - Lead id, receipt timestamp, and the
//!   transport-supplied client IP. Every field defaults to an empty string,
//!   never an absent key.
//!
//! ## Main entry points
//!
//! Call [`validate`] with a [`RawSubmission`] to get a [`ValidationResult`];
//! if it passes, call [`sanitize`] to get a [`CanonicalSubmission`].
//!
//! ## Example
//!
//! ```
//! use intake::{sanitize, validate, RawSubmission};
//!
//! let raw = RawSubmission {
//!     name: "Jane Doe".into(),
//!     phone: "574-318-7797".into(),
//!     address: "123 Main St, South Bend, IN".into(),
//!     service_type: "House Lockout".into(),
//!     needed: "ASAP".into(),
//!     ..RawSubmission::default()
//! };
//!
//! let result = validate(&raw);
//! assert!(result.is_valid());
//!
//! let lead = sanitize(&raw, "203.0.113.7");
//! assert_eq!(lead.phone, "(574) 318-7797");
//! assert!(lead.is_urgent());
//! ```

mod sanitize;
mod types;
mod validate;

pub use crate::sanitize::{escape_html, format_phone, sanitize};
pub use crate::types::{CanonicalSubmission, RawSubmission, ValidationResult, URGENT_NEEDED};
pub use crate::validate::{digits, validate};
