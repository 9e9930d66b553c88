pub mod chat_request;
pub(crate) mod dispatch;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{Credentials, Settings};
use crate::error::Result as AppResult;
use crate::pools::PoolTable;
use crate::providers::UpstreamClient;

/// Shared per-process state. Everything here is built once at startup and
/// only read during dispatch, so concurrent requests need no locks.
pub struct AppState {
    pub pools: PoolTable,
    pub upstream: UpstreamClient,
}

pub fn create_app(config: &Settings, credentials: Credentials) -> AppResult<Router> {
    let app_state = AppState {
        pools: PoolTable::from_credentials(&credentials),
        upstream: UpstreamClient::new(&config.upstream)?,
    };

    // Browser front-end calls this from arbitrary origins; preflight OPTIONS
    // is answered by the CORS layer itself.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(handlers::routes()
        .with_state(Arc::new(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
