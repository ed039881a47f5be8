//! HTTP handlers for the tool server

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use super::AppContext;
use crate::mcp::{ServiceDescriptor, ToolCallEnvelope, ToolCallRequest};

/// Error response: `{"error": "<message>"}`
pub struct AppError(crate::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<crate::Error> for AppError {
    fn from(err: crate::Error) -> Self {
        AppError(err)
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `GET /`
pub async fn root() -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor::current())
}

/// `POST /tool_call`
///
/// Validation failures are 400. Anything the bridge returns, including its
/// own `{"error": ...}` payload, is a 200 nested under `results`.
pub async fn tool_call(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<Json<ToolCallEnvelope>, AppError> {
    let request = ToolCallRequest::from_body(&body).inspect_err(|e| {
        warn!(error = ?e, "Rejected tool call");
    })?;

    let results = ctx.bridge.handle(&request).await;
    Ok(Json(ToolCallEnvelope { results }))
}
