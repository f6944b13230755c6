//! Human-verification gate for incoming lead submissions.
//!
//! Wraps the reCAPTCHA `siteverify` endpoint behind a verifier that is
//! constructed once per process. The verifier fails closed: a transport
//! error, a non-success status, or a provider rejection all block the
//! submission, and there are no retries.
//!
//! Verification is bypassed only when no secret is configured or the
//! deployment environment is [`Environment::Development`]. The bypass is
//! decided at construction from typed configuration, so with a secret set
//! and `Environment::Production` no code path skips the provider call.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Deployment environment, as far as verification gating is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

/// Verifies submission tokens against the reCAPTCHA siteverify API.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    endpoint: String,
    secret: String,
    bypass: bool,
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl RecaptchaVerifier {
    /// Build a verifier from the configured secret and environment. An empty
    /// secret or a development environment turns verification into a no-op
    /// that passes every token.
    pub fn new(secret: impl Into<String>, environment: Environment) -> Self {
        let secret = secret.into();
        let bypass = secret.is_empty() || environment == Environment::Development;
        if bypass {
            warn!("captcha verification is bypassed (no secret or development environment)");
        }
        let client = reqwest::Client::builder()
            .timeout(VERIFY_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            endpoint: SITEVERIFY_URL.to_string(),
            secret,
            bypass,
        }
    }

    /// Point the verifier at a different siteverify endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Whether submissions are actually checked against the provider.
    pub fn enforced(&self) -> bool {
        !self.bypass
    }

    /// Verify one submission token. Returns `true` only when the provider
    /// confirms the token (or verification is bypassed by configuration).
    /// An empty token with a configured secret fails without a network call.
    pub async fn verify(&self, token: &str, client_ip: &str) -> bool {
        if self.bypass {
            debug!("captcha check skipped by configuration");
            return true;
        }
        if token.is_empty() {
            warn!("submission carried no captcha token");
            return false;
        }
        match self.siteverify(token, client_ip).await {
            Ok(response) => {
                if !response.success {
                    warn!(error_codes = ?response.error_codes, "captcha rejected by provider");
                }
                response.success
            }
            Err(err) => {
                // Fail closed: an unreachable provider blocks the submission.
                warn!(error = %err, "captcha verification failed");
                false
            }
        }
    }

    async fn siteverify(
        &self,
        token: &str,
        client_ip: &str,
    ) -> Result<SiteverifyResponse, reqwest::Error> {
        let params = [
            ("secret", self.secret.as_str()),
            ("response", token),
            ("remoteip", client_ip),
        ];
        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;
        response.json::<SiteverifyResponse>().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // An endpoint that would fail instantly if anything tried to reach it.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/siteverify";

    #[tokio::test]
    async fn empty_secret_passes_without_network() {
        let verifier = RecaptchaVerifier::new("", Environment::Production)
            .with_endpoint(DEAD_ENDPOINT);
        assert!(!verifier.enforced());
        assert!(verifier.verify("", "1.2.3.4").await);
        assert!(verifier.verify("any-token", "1.2.3.4").await);
    }

    #[tokio::test]
    async fn development_environment_passes_without_network() {
        let verifier = RecaptchaVerifier::new("secret", Environment::Development)
            .with_endpoint(DEAD_ENDPOINT);
        assert!(!verifier.enforced());
        assert!(verifier.verify("", "1.2.3.4").await);
    }

    #[tokio::test]
    async fn production_with_secret_is_enforced() {
        let verifier = RecaptchaVerifier::new("secret", Environment::Production)
            .with_endpoint(DEAD_ENDPOINT);
        assert!(verifier.enforced());
    }

    #[tokio::test]
    async fn empty_token_fails_before_the_network() {
        let verifier = RecaptchaVerifier::new("secret", Environment::Production)
            .with_endpoint(DEAD_ENDPOINT);
        assert!(!verifier.verify("", "1.2.3.4").await);
    }

    #[tokio::test]
    async fn unreachable_provider_fails_closed() {
        let verifier = RecaptchaVerifier::new("secret", Environment::Production)
            .with_endpoint(DEAD_ENDPOINT);
        assert!(!verifier.verify("some-token", "1.2.3.4").await);
    }

    #[test]
    fn environment_parses_from_lowercase() {
        let env: Environment = serde_json::from_str(r#""development""#).unwrap();
        assert_eq!(env, Environment::Development);
        let env: Environment = serde_json::from_str(r#""production""#).unwrap();
        assert_eq!(env, Environment::Production);
    }
}
