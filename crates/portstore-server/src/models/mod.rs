//! Portstore Data Models
//!
//! - Port: wire representation of a shipping port record
//! - Response: success and error envelopes shared by every route

mod port;
mod response;

pub use port::*;
pub use response::*;
