use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::response::IntoResponse;
use axum::{Json, RequestExt};
use intake::RawSubmission;
use serde_json::json;

use crate::error::{ServerError, ServerResult};
use crate::middleware::client_ip;
use crate::state::ServerState;

/// The lead-submission endpoint (POST).
///
/// Runs the request through the pipeline in strict order - parse, validate,
/// captcha, sanitize, dispatch - and maps each failure class to its wire
/// status. Exactly one dispatch attempt per request; all retry/fallback
/// behavior lives inside the dispatcher.
pub async fn submit_form(
    State(state): State<Arc<ServerState>>,
    request: Request,
) -> ServerResult<impl IntoResponse> {
    let ip = client_ip(&request);

    let Json(raw): Json<RawSubmission> =
        request
            .extract()
            .await
            .map_err(|rejection: JsonRejection| {
                tracing::debug!(error = %rejection, "rejected malformed submission body");
                ServerError::MalformedBody
            })?;

    let (submission, outcome) =
        leadgate::process_submission(&raw, &ip, &state.verifier, &state.dispatcher).await?;

    tracing::info!(
        id = %submission.id,
        channel = %outcome.channel,
        service_type = %submission.service_type,
        urgent = submission.is_urgent(),
        "lead accepted"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Form submitted successfully",
    })))
}

/// Public form bootstrap (GET): what the browser needs to render the form.
/// Secrets never appear here.
pub async fn form_config(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "recaptcha_site_key": state.config.recaptcha_site_key,
        "captcha_enforced": state.verifier.enforced(),
        "business_name": state.config.business_name,
        "business_phone": state.config.business_phone,
    })))
}
