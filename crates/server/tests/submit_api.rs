//! Integration tests for the submission endpoint
//!
//! Drive the full router in-process: parse → validate → captcha → sanitize →
//! dispatch, with scripted notification channels standing in for the real
//! delivery paths.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use captcha::RecaptchaVerifier;
use intake::CanonicalSubmission;
use notify::{
    ChannelKind, NotificationContent, NotificationDispatcher, NotifyChannel, NotifyError,
};
use server::{build_router, ServerConfig, ServerState};

type Sent = Arc<Mutex<Vec<(String, CanonicalSubmission)>>>;

/// Channel double that records every send and succeeds or fails on demand.
struct ScriptedChannel {
    kind: ChannelKind,
    fail: bool,
    sent: Sent,
}

impl ScriptedChannel {
    fn new(kind: ChannelKind, fail: bool) -> (Self, Sent) {
        let sent = Sent::default();
        (
            Self {
                kind,
                fail,
                sent: sent.clone(),
            },
            sent,
        )
    }
}

#[async_trait]
impl NotifyChannel for ScriptedChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(
        &self,
        submission: &CanonicalSubmission,
        content: &NotificationContent,
    ) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .unwrap()
            .push((content.subject.clone(), submission.clone()));
        if self.fail {
            Err(NotifyError::Api("scripted failure".into()))
        } else {
            Ok(())
        }
    }
}

fn test_state(config: ServerConfig, channels: Vec<Box<dyn NotifyChannel>>) -> Arc<ServerState> {
    let verifier =
        RecaptchaVerifier::new(config.recaptcha_secret_key.clone(), config.environment);
    let dispatcher = NotificationDispatcher::with_channels(config.notify_config(), channels);
    Arc::new(ServerState::with_components(config, verifier, dispatcher))
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([203, 0, 113, 7], 4242))));
    request
}

fn jane_doe() -> serde_json::Value {
    serde_json::json!({
        "name": "Jane Doe",
        "phone": "5743187797",
        "address": "123 Main St, South Bend, IN",
        "service_type": "House Lockout",
        "needed": "ASAP"
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn valid_urgent_submission_reaches_the_primary_channel() {
    let (primary, sent) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let app = build_router(test_state(ServerConfig::default(), vec![Box::new(primary)]));

    let response = app
        .oneshot(post_json("/api/v1/submit", jane_doe().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (subject, submission) = &sent[0];
    assert_eq!(subject, "URGENT - New Lead: House Lockout - Jane Doe");
    assert_eq!(submission.phone, "(574) 318-7797");
    assert_eq!(submission.client_ip, "203.0.113.7");
}

#[tokio::test]
async fn short_name_is_rejected_before_dispatch() {
    let (primary, sent) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let app = build_router(test_state(ServerConfig::default(), vec![Box::new(primary)]));

    let mut body = jane_doe();
    body["name"] = serde_json::json!("J");
    let response = app
        .oneshot(post_json("/api/v1/submit", body.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    let errors = body["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e.as_str().unwrap().contains("at least 2 characters")));
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_is_a_400() {
    let (primary, sent) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let app = build_router(test_state(ServerConfig::default(), vec![Box::new(primary)]));

    let response = app
        .oneshot(post_json("/api/v1/submit", "{not json".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid JSON body");
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_post_is_method_not_allowed() {
    let (primary, _) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let app = build_router(test_state(ServerConfig::default(), vec![Box::new(primary)]));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/submit")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn missing_token_fails_captcha_when_enforced() {
    let (primary, sent) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let config = ServerConfig {
        recaptcha_secret_key: "test-secret".into(),
        ..ServerConfig::default()
    };
    let app = build_router(test_state(config, vec![Box::new(primary)]));

    let response = app
        .oneshot(post_json("/api/v1/submit", jane_doe().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "reCAPTCHA verification failed");
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn primary_failure_falls_back_without_changing_the_response() {
    let (primary, primary_sent) = ScriptedChannel::new(ChannelKind::EmailApi, true);
    let (secondary, secondary_sent) = ScriptedChannel::new(ChannelKind::Sendmail, false);
    let app = build_router(test_state(
        ServerConfig::default(),
        vec![Box::new(primary), Box::new(secondary)],
    ));

    let response = app
        .oneshot(post_json("/api/v1/submit", jane_doe().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(primary_sent.lock().unwrap().len(), 1);
    assert_eq!(secondary_sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn total_delivery_failure_is_a_500() {
    let (primary, _) = ScriptedChannel::new(ChannelKind::EmailApi, true);
    let (secondary, _) = ScriptedChannel::new(ChannelKind::Sendmail, true);
    let (tertiary, _) = ScriptedChannel::new(ChannelKind::FileQueue, true);
    let app = build_router(test_state(
        ServerConfig::default(),
        vec![Box::new(primary), Box::new(secondary), Box::new(tertiary)],
    ));

    let response = app
        .oneshot(post_json("/api/v1/submit", jane_doe().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Failed to send notification");
}

#[tokio::test]
async fn legacy_submit_path_is_served() {
    let (primary, sent) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let app = build_router(test_state(ServerConfig::default(), vec![Box::new(primary)]));

    let response = app
        .oneshot(post_json("/api/submit-form", jane_doe().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limit_rejects_the_excess_request() {
    let (primary, _) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let config = ServerConfig {
        rate_limit_per_hour: 1,
        ..ServerConfig::default()
    };
    let app = build_router(test_state(config, vec![Box::new(primary)]));

    let first = app
        .clone()
        .oneshot(post_json("/api/v1/submit", jane_doe().to_string()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app
        .oneshot(post_json("/api/v1/submit", jane_doe().to_string()))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn form_config_exposes_the_site_key_but_never_the_secret() {
    let (primary, _) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let config = ServerConfig {
        recaptcha_site_key: "site-key-abc".into(),
        recaptcha_secret_key: "s3cret-value".into(),
        business_phone: "(574) 318-7797".into(),
        ..ServerConfig::default()
    };
    let app = build_router(test_state(config, vec![Box::new(primary)]));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/v1/form-config")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("site-key-abc"));
    assert!(!text.contains("s3cret-value"));

    let body: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["captcha_enforced"], true);
    assert_eq!(body["business_phone"], "(574) 318-7797");
}

#[tokio::test]
async fn unknown_route_is_a_404_envelope() {
    let (primary, _) = ScriptedChannel::new(ChannelKind::EmailApi, false);
    let app = build_router(test_state(ServerConfig::default(), vec![Box::new(primary)]));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/nope")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}
