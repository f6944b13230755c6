use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{RawSubmission, ValidationResult};

/// Letters, whitespace, hyphens, and apostrophes only.
static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s'-]+$").expect("name pattern compiles"));

/// Loose address shape: one `@`, no whitespace, dotted domain.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

const MIN_NAME_CHARS: usize = 2;
const MIN_ADDRESS_CHARS: usize = 5;
const PHONE_DIGITS: usize = 10;

/// Check a raw submission against the form's field rules.
///
/// Rules are evaluated independently and every violation is collected, so a
/// submission missing three fields gets three messages. Pure and
/// deterministic: same input, same result.
pub fn validate(raw: &RawSubmission) -> ValidationResult {
    let mut result = ValidationResult::default();

    for (value, label) in [
        (&raw.name, "Name"),
        (&raw.phone, "Phone"),
        (&raw.address, "Address"),
        (&raw.service_type, "Service type"),
        (&raw.needed, "Needed"),
    ] {
        if value.trim().is_empty() {
            result.push(format!("{label} is required"));
        }
    }

    let name = raw.name.trim();
    if !name.is_empty() {
        if name.chars().count() < MIN_NAME_CHARS {
            result.push(format!(
                "Name must be at least {MIN_NAME_CHARS} characters long"
            ));
        }
        if !NAME_PATTERN.is_match(name) {
            result.push("Name contains invalid characters");
        }
    }

    if !raw.phone.trim().is_empty() && digits(&raw.phone).len() != PHONE_DIGITS {
        result.push(format!("Phone number must be exactly {PHONE_DIGITS} digits"));
    }

    let email = raw.email.trim();
    if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
        result.push("Invalid email address");
    }

    let address = raw.address.trim();
    if !address.is_empty() && address.chars().count() < MIN_ADDRESS_CHARS {
        result.push("Please provide a complete address");
    }

    result
}

/// Keep only ASCII digits. The shared phone-normalization primitive for
/// validation and formatting.
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}
