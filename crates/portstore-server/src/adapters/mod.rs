//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod memory;

// Re-exports
pub use memory::InMemoryPortRepository;
