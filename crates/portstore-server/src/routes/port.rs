//! Port Routes - Shipping port management
//!
//! HTTP handlers that delegate to PortService and PortIngestor.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{delete, get},
    Json, Router,
};

use portstore::{Port, PortFields};

use super::{request_scope, ApiError};
use crate::models::{
    CountResponse, DeletePortsQuery, IngestResponse, PortPayload, PortQuery, PortResponse,
    ResponseOk,
};
use crate::AppState;

/// Get Port by ID
#[utoipa::path(
    get,
    path = "/port",
    params(PortQuery),
    responses(
        (status = 200, description = "Port found", body = crate::models::PortEnvelope),
        (status = 400, description = "Missing port ID", body = crate::models::ErrorResponse),
        (status = 404, description = "Port not found", body = crate::models::ErrorResponse)
    ),
    tag = "Port"
)]
pub async fn get_port(
    State(state): State<AppState>,
    Query(query): Query<PortQuery>,
) -> Result<Json<ResponseOk<PortResponse>>, ApiError> {
    let id = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing-port-id"))?;

    let (cancel, _guard) = request_scope(&state);
    let port = state.port_service.get(&cancel, &id).await?;

    Ok(Json(ResponseOk::new(PortResponse::from(port))))
}

/// Create or replace a single Port
///
/// The stored record is replaced wholesale; omitted fields are cleared.
#[utoipa::path(
    put,
    path = "/port",
    request_body = crate::models::PortPayload,
    responses(
        (status = 200, description = "Port stored", body = crate::models::PortEnvelope),
        (status = 400, description = "Invalid or missing port", body = crate::models::ErrorResponse)
    ),
    tag = "Port"
)]
pub async fn upsert_port(
    State(state): State<AppState>,
    payload: Result<Json<Option<PortPayload>>, JsonRejection>,
) -> Result<Json<ResponseOk<PortResponse>>, ApiError> {
    let Json(payload) =
        payload.map_err(|e| ApiError::bad_request("invalid-json").with_cause(e.body_text()))?;

    let port = payload
        .map(|p| Port::from_fields(PortFields::from(p)))
        .transpose()?;

    let (cancel, _guard) = request_scope(&state);
    let stored = state.port_service.upsert(&cancel, port).await?;

    Ok(Json(ResponseOk::new(PortResponse::from(stored))))
}

/// Count stored Ports
#[utoipa::path(
    get,
    path = "/count",
    responses(
        (status = 200, description = "Number of stored ports", body = crate::models::CountEnvelope)
    ),
    tag = "Port"
)]
pub async fn count_ports(
    State(state): State<AppState>,
) -> Result<Json<ResponseOk<CountResponse>>, ApiError> {
    let (cancel, _guard) = request_scope(&state);
    let count = state.port_service.count(&cancel).await?;

    Ok(Json(ResponseOk::new(CountResponse { count })))
}

/// Bulk upload Ports
///
/// The body is a JSON object keyed by port ID and is decoded as it
/// arrives. Ports before the first bad entry stay stored.
#[utoipa::path(
    post,
    path = "/ports",
    request_body(
        content = std::collections::HashMap<String, crate::models::PortPayload>,
        description = "Ports keyed by port ID",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "All ports stored", body = crate::models::IngestEnvelope),
        (status = 400, description = "Malformed JSON or invalid port", body = crate::models::ErrorResponse),
        (status = 503, description = "Upload cancelled", body = crate::models::ErrorResponse)
    ),
    tag = "Port"
)]
pub async fn upload_ports(
    State(state): State<AppState>,
    body: Body,
) -> Result<Json<ResponseOk<IngestResponse>>, ApiError> {
    let (cancel, _guard) = request_scope(&state);
    let total_ports = state
        .port_ingestor
        .ingest_stream(body.into_data_stream(), &cancel)
        .await?;

    Ok(Json(ResponseOk::new(IngestResponse { total_ports })))
}

/// Delete all Ports
#[utoipa::path(
    delete,
    path = "/ports",
    params(DeletePortsQuery),
    responses(
        (status = 200, description = "All ports deleted", body = crate::models::MessageEnvelope),
        (status = 400, description = "Missing all=true", body = crate::models::ErrorResponse)
    ),
    tag = "Port"
)]
pub async fn delete_all_ports(
    State(state): State<AppState>,
    Query(query): Query<DeletePortsQuery>,
) -> Result<Json<ResponseOk<String>>, ApiError> {
    if !query.confirms_all() {
        return Err(ApiError::bad_request("missing-all-parameter"));
    }

    let (cancel, _guard) = request_scope(&state);
    state.port_service.delete_all(&cancel).await?;

    Ok(Json(ResponseOk::new(
        "all ports deleted successfully".to_string(),
    )))
}

/// Delete Port by ID
#[utoipa::path(
    delete,
    path = "/ports/{id}",
    params(
        ("id" = String, Path, description = "Port ID")
    ),
    responses(
        (status = 200, description = "Port deleted", body = crate::models::MessageEnvelope),
        (status = 404, description = "Port not found", body = crate::models::ErrorResponse)
    ),
    tag = "Port"
)]
pub async fn delete_port(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResponseOk<String>>, ApiError> {
    let (cancel, _guard) = request_scope(&state);
    state.port_service.delete_by_id(&cancel, &id).await?;

    Ok(Json(ResponseOk::new(format!(
        "deleted port[{}] successfully",
        id
    ))))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/port", get(get_port).put(upsert_port))
        .route("/count", get(count_ports))
        .route("/ports", delete(delete_all_ports).post(upload_ports))
        .route("/ports/:id", delete(delete_port))
}
