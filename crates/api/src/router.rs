//! Router construction for the `pm-api` binary and its integration tests.

use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::cors::{build_cors_layer, options_no_content};
use crate::routes;
use crate::state::AppState;

/// Assemble the project manager API: root banner and health probe, the
/// `/api` resource tree, and the HTTP middleware shared by every route.
///
/// Each `.layer` wraps everything added before it. From the outermost in:
///
/// 1. `OPTIONS` rewrite to 204
/// 2. CORS for the configured frontend origin(s)
/// 3. `x-request-id` assignment
/// 4. Request/response spans
/// 5. `x-request-id` echoed on the response
/// 6. `REQUEST_TIMEOUT_SECS` deadline (408)
/// 7. Handler panics turned into 500s
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = build_cors_layer(config);
    let request_id_header = HeaderName::from_static("x-request-id");
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Spans at INFO so `tower_http=info` is enough to see each request.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        // Outside CORS so preflights answered there are rewritten too.
        .layer(axum::middleware::from_fn(options_no_content))
        .with_state(state)
}
