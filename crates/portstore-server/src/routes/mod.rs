//! Portstore API Routes
//!
//! - /health - Liveness probe
//! - /port - Single port lookup and upsert
//! - /count - Number of stored ports
//! - /ports - Bulk upload and bulk delete
//! - /ports/:id - Delete one port

pub mod error;
pub mod health;
pub mod port;
pub mod swagger;

use axum::Router;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

use crate::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let openapi = swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .merge(health::router())
        .merge(port::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Cancellation scope for one request
///
/// The token is cancelled when the server gives up on in-flight work or
/// when the returned guard drops (handler finished or client went away).
pub(crate) fn request_scope(state: &AppState) -> (CancellationToken, DropGuard) {
    let cancel = state.cancel_root.child_token();
    let guard = cancel.clone().drop_guard();
    (cancel, guard)
}
