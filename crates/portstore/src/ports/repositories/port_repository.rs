//! Port Repository Port
//!
//! Abstract interface for Port persistence operations.
//!
//! Every call takes the caller's cancellation token. Implementations check it
//! once, before doing any work; an operation that has started is never
//! abandoned half way.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{errors::DomainError, Port};

/// Repository interface for Port entities
///
/// All methods must be safe to call concurrently from any number of tasks.
#[async_trait]
pub trait PortRepository: Send + Sync {
    /// Find a Port by ID
    ///
    /// Returns [`DomainError::NotFound`] when no record has that ID.
    async fn get(&self, cancel: &CancellationToken, id: &str) -> Result<Port, DomainError>;

    /// Number of stored Ports
    async fn count(&self, cancel: &CancellationToken) -> Result<usize, DomainError>;

    /// Save a Port (insert or replace) and return the stored snapshot
    ///
    /// An existing record is replaced wholesale by the incoming fields, not
    /// merged; only its creation timestamp survives. Returns
    /// [`DomainError::NilRecord`] when `port` is `None`.
    async fn upsert(
        &self,
        cancel: &CancellationToken,
        port: Option<Port>,
    ) -> Result<Port, DomainError>;

    /// Delete a Port by ID
    async fn delete_by_id(&self, cancel: &CancellationToken, id: &str)
        -> Result<(), DomainError>;

    /// Delete every Port in one step
    async fn delete_all(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
}
