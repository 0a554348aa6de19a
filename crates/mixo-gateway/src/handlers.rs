use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mixo_core::ConvertError;
use mixo_core::service::URL_REQUIRED_MESSAGE;

use super::server::AppState;

const FAILURE_PREFIX: &str = "Failed to convert recipe: ";

#[derive(serde::Deserialize)]
pub(crate) struct ConvertRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    provider_configured: bool,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn convert_error_response(err: &ConvertError) -> Response {
    match err {
        ConvertError::InvalidInput(msg) => error_response(StatusCode::BAD_REQUEST, msg.as_str()),
        ConvertError::Unconfigured => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        other => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{FAILURE_PREFIX}{other}"),
        ),
    }
}

/// The body is parsed by hand so that malformed JSON maps to the prefixed 500
/// instead of axum's extractor rejection.
pub(crate) async fn convert_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: ConvertRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("unparseable conversion request: {e}");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{FAILURE_PREFIX}{e}"),
            );
        }
    };

    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, URL_REQUIRED_MESSAGE);
    };

    match state.service.convert_to_envelope(&url).await {
        Ok(envelope) => Json(envelope).into_response(),
        Err(e) => {
            tracing::error!("conversion failed: {e}");
            convert_error_response(&e)
        }
    }
}

pub(crate) async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub(crate) async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        provider_configured: state.service.is_configured(),
    })
}
