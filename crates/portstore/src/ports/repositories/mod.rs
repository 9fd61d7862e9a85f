//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod port_repository;

pub use port_repository::*;
