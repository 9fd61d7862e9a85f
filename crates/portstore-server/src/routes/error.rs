//! API Errors
//!
//! Maps domain and ingestion failures onto status codes and the error
//! envelope. The underlying cause is logged here and never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use portstore::DomainError;

use crate::application::IngestError;
use crate::models::ErrorResponse;

/// Error returned by every handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    slug: &'static str,
    cause: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, slug: &'static str) -> Self {
        Self {
            status,
            slug,
            cause: None,
        }
    }

    pub fn bad_request(slug: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, slug)
    }

    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[cfg(test)]
    pub fn slug(&self) -> &'static str {
        self.slug
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let api_error = match &err {
            DomainError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, "port-not-found"),
            DomainError::Validation(_) => Self::bad_request("invalid-port"),
            DomainError::NilRecord => Self::bad_request("nil-port"),
            DomainError::Cancelled => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "request-cancelled")
            }
            DomainError::Repository(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal-server-error")
            }
        };
        api_error.with_cause(err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Format(e) => Self::bad_request("invalid-json").with_cause(e),
            IngestError::Validation(msg) => Self::bad_request("invalid-port").with_cause(msg),
            IngestError::Repository(e) => Self::from(e),
            IngestError::Cancelled => Self::from(DomainError::Cancelled),
            IngestError::Decoder(msg) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal-server-error")
                    .with_cause(msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let cause = self.cause.as_deref().unwrap_or("-");
        if self.status.is_server_error() {
            tracing::error!(slug = self.slug, status = %self.status, "Request failed: {}", cause);
        } else {
            tracing::warn!(slug = self.slug, status = %self.status, "Request rejected: {}", cause);
        }

        (self.status, Json(ErrorResponse::new(self.status, self.slug))).into_response()
    }
}
