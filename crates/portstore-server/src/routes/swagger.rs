//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    CountEnvelope, CountResponse, ErrorResponse, IngestEnvelope, IngestResponse,
    MessageEnvelope, PortEnvelope, PortPayload, PortResponse,
};

use super::health::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health::health_check,
        // Port endpoints
        super::port::get_port,
        super::port::upsert_port,
        super::port::count_ports,
        super::port::upload_ports,
        super::port::delete_all_ports,
        super::port::delete_port,
    ),
    info(
        title = "Portstore API",
        version = "0.1.0",
        description = "In-memory store of shipping port records with streaming bulk upload.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Port", description = "Port - Shipping port records"),
    ),
    components(
        schemas(
            HealthCheck,
            // Port
            PortPayload,
            PortResponse,
            CountResponse,
            IngestResponse,
            // Envelopes
            PortEnvelope,
            CountEnvelope,
            IngestEnvelope,
            MessageEnvelope,
            ErrorResponse,
        )
    ),
)]
pub struct ApiDoc;
