use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::pools::resolve_mode;
use crate::server::AppState;
use crate::server::chat_request::ChatProxyRequest;
use crate::server::dispatch::{DispatchOutcome, run_failover};

pub async fn chat_completions(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    // `messages` must be an array before anything else happens; a bad body
    // never consumes a credential.
    if !body.get("messages").is_some_and(Value::is_array) {
        return client_error("messages must be an array");
    }

    let request: ChatProxyRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return client_error(&format!("invalid request body: {}", e)),
    };

    let mode = resolve_mode(request.model.as_deref());
    let entries = app_state.pools.entries_for(mode);
    tracing::info!(mode, entries = entries.len(), "dispatching chat request");

    match run_failover(&app_state.upstream, entries, &request).await {
        DispatchOutcome::Success(upstream_body) => {
            (StatusCode::OK, Json(upstream_body)).into_response()
        }
        DispatchOutcome::Exhausted { last_error } => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "all upstream credentials exhausted",
                "details": last_error,
            })),
        )
            .into_response(),
    }
}

/// True preflights are intercepted by the CORS layer; this catches bare
/// OPTIONS calls (no preflight headers) so they also get an empty 200.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn client_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
