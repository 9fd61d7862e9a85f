//! Portstore Domain Library
//!
//! Core domain types and interfaces for the Portstore shipping port registry.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Port)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use portstore::{Port, PortFields, PortRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{DomainError, Port, PortFields};
pub use ports::PortRepository;

// Cancellation is part of every repository call signature
pub use tokio_util::sync::CancellationToken;
