use std::net::SocketAddr;
use std::time::Duration;

use captcha::Environment;
use notify::NotifyConfig;
use serde::{Deserialize, Serialize};

/// Server configuration
///
/// Loaded once at process start from a `.env` file, `LEADGATE_*` environment
/// variables, and an optional `leadgate.toml`. Every field has a documented
/// default so a bare process still boots (with the fallback queue doing the
/// heavy lifting until credentials are configured).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in KB
    #[serde(default = "default_max_body_size_kb")]
    pub max_body_size_kb: usize,

    /// Rate limit: submissions per hour per client IP
    #[serde(default = "default_rate_limit_per_hour")]
    pub rate_limit_per_hour: u32,

    /// Enable permissive CORS (the form is posted from the public website)
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deployment environment; gates the captcha bypass and nothing else
    #[serde(default)]
    pub environment: Environment,

    /// reCAPTCHA site key, handed to the browser via the form-config route
    #[serde(default)]
    pub recaptcha_site_key: String,

    /// reCAPTCHA secret; empty disables verification
    #[serde(default)]
    pub recaptcha_secret_key: String,

    /// Transactional email API key; empty fails the primary channel over to
    /// the rest of the chain
    #[serde(default)]
    pub resend_api_key: String,

    /// Where lead notifications are sent
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

    /// Directory for the durable fallback queue
    #[serde(default = "default_fallback_dir")]
    pub fallback_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_kb: default_max_body_size_kb(),
            rate_limit_per_hour: default_rate_limit_per_hour(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            environment: Environment::default(),
            recaptcha_site_key: String::new(),
            recaptcha_secret_key: String::new(),
            resend_api_key: String::new(),
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

impl ServerConfig {
    /// Load configuration from `.env`, environment variables, and an
    /// optional config file.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("leadgate").required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("LEADGATE").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.environment == Environment::Production {
            if config.resend_api_key.is_empty() {
                tracing::warn!("no email API key configured; primary channel will always fall back");
            }
            if config.notification_email.is_empty() {
                tracing::warn!("no notification email configured; leads land in the fallback queue");
            }
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_kb * 1024
    }

    /// Notification configuration for the dispatcher.
    pub fn notify_config(&self) -> NotifyConfig {
        NotifyConfig {
            api_key: self.resend_api_key.clone(),
            notification_email: self.notification_email.clone(),
            from_email: self.from_email.clone(),
            from_name: self.from_name.clone(),
            business_name: self.business_name.clone(),
            business_phone: self.business_phone.clone(),
            business_email: self.business_email.clone(),
            website_url: self.website_url.clone(),
            fallback_dir: self.fallback_dir.clone(),
            ..NotifyConfig::default()
        }
    }

    /// The caller-safe message for unexpected failures; offers the business
    /// phone as a manual path so the lead is not lost.
    pub fn generic_failure_message(&self) -> String {
        if self.business_phone.is_empty() {
            "An unexpected error occurred. Please try again.".to_string()
        } else {
            format!(
                "An unexpected error occurred. Please call {} directly.",
                self.business_phone
            )
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_kb() -> usize {
    64
}

fn default_rate_limit_per_hour() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
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
