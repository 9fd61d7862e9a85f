//! Response Envelopes
//!
//! Every route answers with one of two shapes: `ResponseOk` wrapping the
//! payload, or `ErrorResponse` carrying a machine-readable slug.

use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{CountResponse, IngestResponse, PortResponse};

const OK_MESSAGE: &str = "Request processed successfully.";

/// Success envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[aliases(
    PortEnvelope = ResponseOk<PortResponse>,
    CountEnvelope = ResponseOk<CountResponse>,
    IngestEnvelope = ResponseOk<IngestResponse>,
    MessageEnvelope = ResponseOk<String>
)]
#[serde(rename_all = "camelCase")]
pub struct ResponseOk<T> {
    /// Human-readable message
    pub message: String,
    pub http_status: u16,
    pub data: T,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl<T> ResponseOk<T> {
    pub fn new(data: T) -> Self {
        Self {
            message: OK_MESSAGE.to_string(),
            http_status: StatusCode::OK.as_u16(),
            data,
            timestamp: now_rfc3339(),
        }
    }
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Concise, machine-readable error identifier
    pub slug: String,
    /// Human-readable description of the status
    pub message: String,
    pub http_status: u16,
    /// Always null; causes are logged, not returned
    pub details: Option<serde_json::Value>,
    /// RFC 3339, UTC
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            message: status_message(status).to_string(),
            http_status: status.as_u16(),
            details: None,
            timestamp: now_rfc3339(),
        }
    }
}

fn status_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::SERVICE_UNAVAILABLE => "Service unavailable",
        _ => "Internal server error",
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
