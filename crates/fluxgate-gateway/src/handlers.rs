// SPDX-FileCopyrightText: 2026 Fluxgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /v1/process, GET /v1/requests, GET /v1/images/{path},
//! GET /health. Every handler is a total function into `Response`; failures
//! map to JSON error bodies, never to an escaped panic.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use fluxgate_core::{ModelRequest, ModelType, ProcessingResult};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_secs: u64,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Raw request body before field validation.
///
/// Fields stay optional so missing ones can be named in the 400 response,
/// and `modelType` stays a string until checked against the known variants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawModelRequest {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    input: Option<String>,
    #[serde(default)]
    model_type: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

impl RawModelRequest {
    /// Validate presence and non-emptiness of every field.
    ///
    /// Returns a well-formed [`ModelRequest`] or the client-facing reason
    /// for the 400.
    pub(crate) fn validate(self) -> Result<ModelRequest, String> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|s| !s.trim().is_empty())
        }

        let id = present(self.id);
        let input = present(self.input);
        let model_type = present(self.model_type);
        let user_id = present(self.user_id);

        let mut missing = Vec::new();
        if id.is_none() {
            missing.push("id");
        }
        if input.is_none() {
            missing.push("input");
        }
        if model_type.is_none() {
            missing.push("modelType");
        }
        if user_id.is_none() {
            missing.push("userId");
        }

        let (Some(id), Some(input), Some(model_type), Some(user_id)) =
            (id, input, model_type, user_id)
        else {
            return Err(format!("missing required fields: {}", missing.join(", ")));
        };

        let model_type = model_type
            .parse::<ModelType>()
            .map_err(|_| format!("unknown modelType `{model_type}`"))?;

        Ok(ModelRequest {
            id,
            input,
            model_type,
            user_id,
        })
    }
}

/// POST /v1/process
///
/// Parses and validates the body as a [`ModelRequest`], delegates to the
/// processor, and maps its outcome: success -> 200 with the output payload,
/// error -> 500 with the message. Validation failures return 400 before any
/// side effect.
pub async fn post_process(State(state): State<GatewayState>, body: String) -> Response {
    let raw: RawModelRequest = match serde_json::from_str(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "rejected unparseable request body");
            return error_response(StatusCode::BAD_REQUEST, "invalid JSON in request body");
        }
    };

    let request = match raw.validate() {
        Ok(request) => request,
        Err(message) => {
            warn!(%message, "rejected malformed request");
            return error_response(StatusCode::BAD_REQUEST, message);
        }
    };

    match state.processor.process(&request).await {
        ProcessingResult::Success { data } => (StatusCode::OK, Json(data)).into_response(),
        ProcessingResult::Error { kind, error } => {
            error!(id = %request.id, %kind, %error, "request processing failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, error)
        }
    }
}

/// Query parameters for GET /v1/requests.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// GET /v1/requests?user_id=..
///
/// Lists the persisted request records belonging to one user, newest first.
pub async fn list_requests(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> Response {
    let Some(user_id) = query.user_id.filter(|u| !u.trim().is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "user_id query parameter is required",
        );
    };

    match state.requests.list_requests(&user_id).await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            error!(user_id = %user_id, error = %e, "failed to list requests");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch requests")
        }
    }
}

/// GET /v1/images/{userId}/{file}
///
/// Streams a generated image back from the object store. Anything that goes
/// wrong during lookup is reported as not-found, as the path is
/// caller-supplied.
pub async fn get_image(State(state): State<GatewayState>, Path(path): Path<String>) -> Response {
    match state.objects.download(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) => {
            warn!(path = %path, error = %e, "image lookup failed");
            error_response(StatusCode::NOT_FOUND, "image not found")
        }
    }
}

/// GET /health
///
/// Returns liveness status of the gateway.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    })
}
