//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and the streaming ingestion pipeline.

mod ingest;
mod port_service;

pub use ingest::{IngestError, PortIngestor};
pub use port_service::PortService;
