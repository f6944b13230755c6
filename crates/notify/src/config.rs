use serde::{Deserialize, Serialize};

/// Notification configuration: provider credentials, addresses, and the
/// business details rendered into every message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Base URL of the transactional email API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API key for the primary channel. Empty means the primary channel
    /// fails immediately and the chain moves on.
    #[serde(default)]
    pub api_key: String,

    /// Where lead notifications are sent.
    #[serde(default)]
    pub notification_email: String,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    #[serde(default = "default_business_name")]
    pub business_name: String,

    #[serde(default)]
    pub business_phone: String,

    #[serde(default)]
    pub business_email: String,

    #[serde(default)]
    pub website_url: String,

    /// Directory for the durable per-day fallback files.
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            notification_email: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            business_name: default_business_name(),
            business_phone: String::new(),
            business_email: String::new(),
            website_url: String::new(),
            fallback_dir: default_fallback_dir(),
        }
    }
}

impl NotifyConfig {
    /// `Name <address>` sender header used by every channel.
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_from_email() -> String {
    "noreply@example.com".to_string()
}

fn default_from_name() -> String {
    "Leadgate".to_string()
}

fn default_business_name() -> String {
    "Leadgate".to_string()
}

fn default_fallback_dir() -> String {
    "logs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_combines_name_and_address() {
        let config = NotifyConfig {
            from_name: "I Locksmith".into(),
            from_email: "noreply@ilocksmith.example".into(),
            ..NotifyConfig::default()
        };
        assert_eq!(config.sender(), "I Locksmith <noreply@ilocksmith.example>");
    }

    #[test]
    fn defaults_are_usable() {
        let config = NotifyConfig::default();
        assert_eq!(config.api_base_url, "https://api.resend.com");
        assert_eq!(config.fallback_dir, "logs");
        assert!(config.api_key.is_empty());
    }
}
