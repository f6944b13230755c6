use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
///
/// Every variant's `Display` string is what the caller sees; anything more
/// specific stays in the operational log. The wire body is always
/// `{success: false, message, errors?}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid JSON body")]
    MalformedBody,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("reCAPTCHA verification failed")]
    CaptchaFailed,

    #[error("Too many requests")]
    RateLimitExceeded,

    #[error("Not found")]
    NotFound,

    #[error("Failed to send notification")]
    Delivery(#[from] notify::NotifyError),

    /// Caller-safe message composed at the catch boundary; the cause is
    /// logged before this is constructed.
    #[error("{0}")]
    Unexpected(String),
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MalformedBody
            | ServerError::Validation(_)
            | ServerError::CaptchaFailed => StatusCode::BAD_REQUEST,
            ServerError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Delivery(_) | ServerError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<leadgate::PipelineError> for ServerError {
    fn from(err: leadgate::PipelineError) -> Self {
        match err {
            leadgate::PipelineError::Invalid(errors) => ServerError::Validation(errors),
            leadgate::PipelineError::CaptchaRejected => ServerError::CaptchaFailed,
            leadgate::PipelineError::Delivery(err) => ServerError::Delivery(err),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let mut body = json!({
            "success": false,
            "message": self.to_string(),
        });
        if status == StatusCode::BAD_REQUEST {
            let errors = match &self {
                ServerError::Validation(errors) => errors.clone(),
                _ => Vec::new(),
            };
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}
