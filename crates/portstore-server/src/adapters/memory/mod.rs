//! In-Memory Repository Implementations

mod port_repository;

pub use port_repository::InMemoryPortRepository;
