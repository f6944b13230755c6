use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::types::{CanonicalSubmission, RawSubmission};
use crate::validate::digits;

/// Free-text fields are capped at this many characters before escaping.
const MAX_FIELD_CHARS: usize = 1000;

/// Build the canonical lead record from a raw submission.
///
/// This is the pipeline's single escaping boundary: every free-text field is
/// trimmed, capped, and HTML-escaped exactly once here, and the notification
/// templates interpolate the results verbatim. `client_ip` must come from
/// the transport layer (socket peer address), not from the request body.
///
/// Pure apart from the clock and the lead-id stamp; no network or disk I/O.
pub fn sanitize(raw: &RawSubmission, client_ip: &str) -> CanonicalSubmission {
    let timestamp = if raw.timestamp.trim().is_empty() {
        Utc::now().to_rfc3339()
    } else {
        clean(&raw.timestamp)
    };

    let lead = CanonicalSubmission {
        id: Uuid::new_v4().to_string(),
        name: clean(&raw.name),
        phone: format_phone(&raw.phone),
        email: clean(&raw.email),
        address: clean(&raw.address),
        service_type: clean(&raw.service_type),
        needed: clean(&raw.needed),
        notes: clean(&raw.notes),
        timestamp,
        page_url: clean(&raw.page_url),
        page_title: clean(&raw.page_title),
        referrer: clean(&raw.referrer),
        user_agent: clean(&raw.user_agent),
        client_ip: client_ip.to_string(),
        form_source: clean(&raw.form_source),
    };
    debug!(id = %lead.id, "submission sanitized");
    lead
}

fn clean(input: &str) -> String {
    let trimmed = input.trim();
    let capped: String = trimmed.chars().take(MAX_FIELD_CHARS).collect();
    escape_html(&capped)
}

/// Encode the five HTML-significant characters. Ampersand first, so already
/// produced entities are not the input here.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `(AAA) BBB-CCCC` when exactly ten digits remain after stripping,
/// otherwise the stripped digit string. Validation normally guarantees ten
/// digits, but the formatter stays total rather than assuming it ran.
pub fn format_phone(input: &str) -> String {
    let d = digits(input);
    if d.len() == 10 {
        format!("({}) {}-{}", &d[..3], &d[3..6], &d[6..])
    } else {
        d
    }
}
