//! Port Application Service (Use Case)
//!
//! Orchestrates domain operations for Port management.

use std::sync::Arc;

use portstore::{CancellationToken, DomainError, Port, PortRepository};

/// Application service for Port operations
pub struct PortService<R: PortRepository> {
    repo: Arc<R>,
}

impl<R: PortRepository> PortService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Get a Port by ID
    pub async fn get(&self, cancel: &CancellationToken, id: &str) -> Result<Port, DomainError> {
        self.repo.get(cancel, id).await
    }

    /// Count stored Ports
    pub async fn count(&self, cancel: &CancellationToken) -> Result<usize, DomainError> {
        self.repo.count(cancel).await
    }

    /// Create or replace a Port, returning what was stored
    pub async fn upsert(
        &self,
        cancel: &CancellationToken,
        port: Option<Port>,
    ) -> Result<Port, DomainError> {
        let stored = self.repo.upsert(cancel, port).await?;
        tracing::debug!("Upserted Port: {}", stored.id());
        Ok(stored)
    }

    /// Delete a Port
    pub async fn delete_by_id(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<(), DomainError> {
        self.repo.delete_by_id(cancel, id).await?;
        tracing::info!("Deleted Port: {}", id);
        Ok(())
    }

    /// Delete every Port
    pub async fn delete_all(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.repo.delete_all(cancel).await?;
        tracing::info!("Deleted all Ports");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryPortRepository;
    use portstore::PortFields;

    fn service() -> PortService<InMemoryPortRepository> {
        PortService::new(Arc::new(InMemoryPortRepository::new()))
    }

    fn port(id: &str) -> Port {
        Port::from_fields(PortFields {
            id: id.to_string(),
            name: "X".to_string(),
            city: "Y".to_string(),
            country: "Z".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_service_mirrors_repository() {
        let service = service();
        let cancel = CancellationToken::new();

        service.upsert(&cancel, Some(port("A"))).await.unwrap();
        service.upsert(&cancel, Some(port("B"))).await.unwrap();
        assert_eq!(service.count(&cancel).await.unwrap(), 2);
        assert_eq!(service.get(&cancel, "A").await.unwrap().id(), "A");

        service.delete_by_id(&cancel, "A").await.unwrap();
        assert!(service.get(&cancel, "A").await.unwrap_err().is_not_found());

        service.delete_all(&cancel).await.unwrap();
        assert_eq!(service.count(&cancel).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_service_passes_errors_through() {
        let service = service();
        let cancel = CancellationToken::new();

        assert_eq!(
            service.upsert(&cancel, None).await.unwrap_err(),
            DomainError::NilRecord
        );
        assert!(service
            .delete_by_id(&cancel, "missing")
            .await
            .unwrap_err()
            .is_not_found());
    }
}
