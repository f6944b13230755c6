use intake::{digits, CanonicalSubmission};

use crate::config::NotifyConfig;

/// Subject prefix applied when the submitter asked for ASAP service.
pub const URGENT_SUBJECT_PREFIX: &str = "URGENT - ";

/// Rendered notification: one subject, one HTML body, one plain-text body.
/// Composed once per dispatch and shared by every channel attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Compose the business-facing lead notification.
///
/// All submission fields arrive pre-escaped from the sanitizer and are
/// interpolated verbatim; nothing here escapes again.
pub fn notification(lead: &CanonicalSubmission, config: &NotifyConfig) -> NotificationContent {
    NotificationContent {
        subject: notification_subject(lead),
        html: notification_html(lead, config),
        text: notification_text(lead),
    }
}

/// Compose the submitter-facing confirmation message.
pub fn confirmation(lead: &CanonicalSubmission, config: &NotifyConfig) -> NotificationContent {
    NotificationContent {
        subject: format!(
            "Thank You - Service Request Received | {}",
            config.business_name
        ),
        html: confirmation_html(lead, config),
        text: confirmation_text(lead, config),
    }
}

fn notification_subject(lead: &CanonicalSubmission) -> String {
    let priority = if lead.is_urgent() {
        URGENT_SUBJECT_PREFIX
    } else {
        ""
    };
    format!("{priority}New Lead: {} - {}", lead.service_type, lead.name)
}

fn notification_html(lead: &CanonicalSubmission, config: &NotifyConfig) -> String {
    let urgent_banner = if lead.is_urgent() {
        "<div style=\"background:#ff0000;color:#fff;padding:10px;text-align:center;\
         font-weight:bold;\">URGENT REQUEST - ASAP SERVICE NEEDED</div>\n"
    } else {
        ""
    };
    let priority_value = if lead.is_urgent() {
        "URGENT - ASAP".to_string()
    } else {
        lead.needed.clone()
    };
    let tel = digits(&lead.phone);

    let mut fields = String::new();
    push_field(&mut fields, "Priority Level", &priority_value);
    push_field(&mut fields, "Customer Name", &lead.name);
    push_field(
        &mut fields,
        "Phone Number",
        &format!("<a href=\"tel:{tel}\">{}</a>", lead.phone),
    );
    if !lead.email.is_empty() {
        push_field(
            &mut fields,
            "Email Address",
            &format!("<a href=\"mailto:{0}\">{0}</a>", lead.email),
        );
    }
    push_field(&mut fields, "Service Address", &lead.address);
    push_field(&mut fields, "Service Type", &lead.service_type);
    if !lead.notes.is_empty() {
        push_field(&mut fields, "Additional Notes", &lead.notes);
    }

    let referrer = if lead.referrer.is_empty() {
        "Direct"
    } else {
        &lead.referrer
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"font-family:sans-serif;line-height:1.6;\">\n\
         {urgent_banner}\
         <h1>New Lead - {business}</h1>\n\
         {fields}\
         <h3>Session Information</h3>\n\
         <p>Timestamp: {timestamp}<br>\n\
         Source Page: <a href=\"{page_url}\">{page_title}</a><br>\n\
         Referrer: {referrer}<br>\n\
         IP Address: {client_ip}</p>\n\
         <hr>\n\
         <p><strong>{business}</strong><br>{phone} | {email}<br>{website}</p>\n\
         </body>\n</html>\n",
        business = config.business_name,
        timestamp = lead.timestamp,
        page_url = lead.page_url,
        page_title = lead.page_title,
        client_ip = lead.client_ip,
        phone = config.business_phone,
        email = config.business_email,
        website = config.website_url,
    )
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!(
        "<p style=\"margin:4px 0;\"><strong>{label}:</strong> {value}</p>\n"
    ));
}

fn notification_text(lead: &CanonicalSubmission) -> String {
    let mut text = String::from("NEW LEAD\n========\n\n");
    if lead.is_urgent() {
        text.push_str("URGENT - ASAP SERVICE NEEDED\n\n");
    }
    text.push_str(&format!("Customer: {}\n", lead.name));
    text.push_str(&format!("Phone: {}\n", lead.phone));
    if !lead.email.is_empty() {
        text.push_str(&format!("Email: {}\n", lead.email));
    }
    text.push_str(&format!("Address: {}\n", lead.address));
    text.push_str(&format!("Service: {}\n", lead.service_type));
    text.push_str(&format!("When Needed: {}\n", lead.needed));
    if !lead.notes.is_empty() {
        text.push_str(&format!("Notes: {}\n", lead.notes));
    }
    text.push_str(&format!(
        "\nSESSION INFO:\nTimestamp: {}\nSource: {}\nURL: {}\nIP: {}\n",
        lead.timestamp, lead.page_title, lead.page_url, lead.client_ip
    ));
    text
}

fn confirmation_html(lead: &CanonicalSubmission, config: &NotifyConfig) -> String {
    let notes_row = if lead.notes.is_empty() {
        String::new()
    } else {
        format!("<p><strong>Notes:</strong> {}</p>\n", lead.notes)
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"font-family:sans-serif;line-height:1.6;\">\n\
         <h1>Request Received</h1>\n\
         <p>Hi {name},</p>\n\
         <p>Thank you for your service request! We have received your information and\n\
         will contact you shortly to discuss your <strong>{service}</strong> needs.</p>\n\
         <h3>Your Request Details</h3>\n\
         <p><strong>Service:</strong> {service}</p>\n\
         <p><strong>Address:</strong> {address}</p>\n\
         <p><strong>When Needed:</strong> {needed}</p>\n\
         {notes_row}\
         <p><strong>Submitted:</strong> {timestamp}</p>\n\
         <p>For urgent assistance, call us directly at <strong>{phone}</strong>.</p>\n\
         <p>Best regards,<br>The {business} Team</p>\n\
         </body>\n</html>\n",
        name = lead.name,
        service = lead.service_type,
        address = lead.address,
        needed = lead.needed,
        timestamp = lead.timestamp,
        phone = config.business_phone,
        business = config.business_name,
    )
}

fn confirmation_text(lead: &CanonicalSubmission, config: &NotifyConfig) -> String {
    let notes_row = if lead.notes.is_empty() {
        String::new()
    } else {
        format!("Notes: {}\n", lead.notes)
    };
    format!(
        "Thank you for your service request!\n\n\
         Hi {name},\n\n\
         We have received your request for {service} service and will contact you shortly.\n\n\
         REQUEST DETAILS:\n\
         Service: {service}\n\
         Address: {address}\n\
         When Needed: {needed}\n\
         {notes_row}\
         Submitted: {timestamp}\n\n\
         For urgent assistance, call us directly at {phone}\n\n\
         Thank you for trusting {business}!\n",
        name = lead.name,
        service = lead.service_type,
        address = lead.address,
        needed = lead.needed,
        timestamp = lead.timestamp,
        phone = config.business_phone,
        business = config.business_name,
    )
}
