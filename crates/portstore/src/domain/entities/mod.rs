//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Port: Shipping port reference record

mod port;

pub use port::*;
