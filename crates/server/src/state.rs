use std::sync::Arc;
use std::time::{Duration, Instant};

use captcha::RecaptchaVerifier;
use dashmap::DashMap;
use notify::NotificationDispatcher;

use crate::config::ServerConfig;

/// Shared application state
///
/// The verifier and dispatcher are constructed once per process and shared
/// across requests; they hold nothing beyond credentials and connection
/// pools, so there is no teardown.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Rate limit tracking: client IP -> (count, window_start)
    pub rate_limiter: Arc<DashMap<String, (u32, Instant)>>,

    /// Captcha verifier (shared across requests)
    pub verifier: Arc<RecaptchaVerifier>,

    /// Notification dispatcher (shared across requests)
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl ServerState {
    /// Create new server state with the production pipeline components.
    pub fn new(config: ServerConfig) -> Self {
        let verifier =
            RecaptchaVerifier::new(config.recaptcha_secret_key.clone(), config.environment);
        let dispatcher = NotificationDispatcher::new(config.notify_config());
        Self::with_components(config, verifier, dispatcher)
    }

    /// Create server state around pre-built components.
    pub fn with_components(
        config: ServerConfig,
        verifier: RecaptchaVerifier,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            verifier: Arc::new(verifier),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Check rate limit for a client IP. The window is one hour, matching
    /// the configured submissions-per-hour limit.
    pub fn check_rate_limit(&self, client_ip: &str) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(3600);
        let limit = self.config.rate_limit_per_hour;

        let mut entry = self
            .rate_limiter
            .entry(client_ip.to_string())
            .or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        // Reset if window has passed
        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        // Check limit
        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_counts_per_ip() {
        let state = ServerState::new(ServerConfig {
            rate_limit_per_hour: 2,
            ..ServerConfig::default()
        });

        assert!(state.check_rate_limit("203.0.113.7"));
        assert!(state.check_rate_limit("203.0.113.7"));
        assert!(!state.check_rate_limit("203.0.113.7"));
        // A different client is unaffected.
        assert!(state.check_rate_limit("203.0.113.8"));
    }
}
