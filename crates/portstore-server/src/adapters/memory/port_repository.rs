//! In-memory implementation of PortRepository
//!
//! One `RwLock` guards the whole table: `get` and `count` share it, every
//! write takes it exclusively. Records cross the lock boundary only as owned
//! copies, so nothing handed to a caller aliases stored data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use portstore::{CancellationToken, DomainError, Port, PortFields, PortRepository};

/// Thread-safe in-memory Port repository
#[derive(Debug, Default)]
pub struct InMemoryPortRepository {
    entries: RwLock<HashMap<String, PortEntry>>,
}

/// Internal row type, never handed out directly
#[derive(Debug, Clone)]
struct PortEntry {
    fields: PortFields,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PortEntry {
    fn new(port: Port, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            fields: port.into_fields(),
            created_at,
            updated_at,
        }
    }

    fn to_port(&self) -> Result<Port, DomainError> {
        let port = Port::from_fields(self.fields.clone()).map_err(|e| {
            DomainError::Repository(format!("stored port {} is corrupt: {}", self.fields.id, e))
        })?;
        Ok(port.with_timestamps(self.created_at, self.updated_at))
    }
}

impl InMemoryPortRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, PortEntry>>, DomainError> {
        self.entries
            .read()
            .map_err(|e| DomainError::Repository(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, PortEntry>>, DomainError> {
        self.entries
            .write()
            .map_err(|e| DomainError::Repository(e.to_string()))
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), DomainError> {
    if cancel.is_cancelled() {
        return Err(DomainError::Cancelled);
    }
    Ok(())
}

#[async_trait]
impl PortRepository for InMemoryPortRepository {
    async fn get(&self, cancel: &CancellationToken, id: &str) -> Result<Port, DomainError> {
        ensure_active(cancel)?;

        let entries = self.read()?;
        entries
            .get(id)
            .ok_or_else(|| DomainError::not_found("Port", id))?
            .to_port()
    }

    async fn count(&self, cancel: &CancellationToken) -> Result<usize, DomainError> {
        ensure_active(cancel)?;

        Ok(self.read()?.len())
    }

    async fn upsert(
        &self,
        cancel: &CancellationToken,
        port: Option<Port>,
    ) -> Result<Port, DomainError> {
        ensure_active(cancel)?;
        let port = port.ok_or(DomainError::NilRecord)?;

        let mut entries = self.write()?;
        let now = Utc::now();
        // Replace, don't merge: only created_at carries over
        let created_at = entries
            .get(port.id())
            .map(|existing| existing.created_at)
            .unwrap_or(now);
        let stored = port.with_timestamps(created_at, now);
        entries.insert(
            stored.id().to_string(),
            PortEntry::new(stored.clone(), created_at, now),
        );

        Ok(stored)
    }

    async fn delete_by_id(
        &self,
        cancel: &CancellationToken,
        id: &str,
    ) -> Result<(), DomainError> {
        ensure_active(cancel)?;

        let mut entries = self.write()?;
        entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Port", id))
    }

    async fn delete_all(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        ensure_active(cancel)?;

        self.write()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn random_port() -> Port {
        let id = Uuid::new_v4().to_string();
        Port::new(
            id.clone(),
            id.clone(),
            id.clone(),
            id.clone(),
            id.clone(),
            vec![],
            vec![],
            vec![],
            id.clone(),
            id,
            vec![],
        )
        .unwrap()
    }

    fn new_york() -> Port {
        Port::from_fields(PortFields {
            id: "USNYC".to_string(),
            name: "New York".to_string(),
            city: "New York".to_string(),
            country: "US".to_string(),
            alias: vec!["NYC".to_string()],
            coordinates: vec![-74.006, 40.7128],
            unlocs: vec!["USNYC".to_string()],
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_port() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();

        repo.upsert(&cancel, Some(new_york())).await.unwrap();

        let port = repo.get(&cancel, "USNYC").await.unwrap();
        assert_eq!(port.id(), "USNYC");
        assert_eq!(port.name(), "New York");
        assert_eq!(port.city(), "New York");
        assert_eq!(port.country(), "US");
        assert_eq!(port.coordinates(), &[-74.006, 40.7128]);
        assert!(port.created_at().is_some());
        assert_eq!(port.created_at(), port.updated_at());
        assert_eq!(repo.count(&cancel).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_returns_stored_snapshot() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();

        let written = repo.upsert(&cancel, Some(new_york())).await.unwrap();
        repo.delete_by_id(&cancel, "USNYC").await.unwrap();

        assert_eq!(written.to_fields(), new_york().to_fields());
        assert!(written.created_at().is_some());
        assert_eq!(written.created_at(), written.updated_at());
    }

    #[tokio::test]
    async fn test_stored_port_matches_input_fields() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();
        let port = random_port();

        repo.upsert(&cancel, Some(port.clone())).await.unwrap();

        let stored = repo.get(&cancel, port.id()).await.unwrap();
        assert_eq!(stored.to_fields(), port.to_fields());
    }

    #[tokio::test]
    async fn test_update_port_keeps_count_and_created_at() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();

        repo.upsert(&cancel, Some(new_york())).await.unwrap();
        let before = repo.get(&cancel, "USNYC").await.unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        let mut renamed = new_york();
        renamed.rename("New Amsterdam").unwrap();
        repo.upsert(&cancel, Some(renamed)).await.unwrap();

        let after = repo.get(&cancel, "USNYC").await.unwrap();
        assert_eq!(repo.count(&cancel).await.unwrap(), 1);
        assert_eq!(after.name(), "New Amsterdam");
        assert_eq!(after.created_at(), before.created_at());
        assert!(after.updated_at() > before.updated_at());
    }

    #[tokio::test]
    async fn test_update_replaces_instead_of_merging() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();

        repo.upsert(&cancel, Some(new_york())).await.unwrap();

        let sparse = Port::new(
            "USNYC",
            "New York",
            "",
            "New York",
            "US",
            vec![],
            vec![],
            vec![],
            "",
            "",
            vec![],
        )
        .unwrap();
        repo.upsert(&cancel, Some(sparse)).await.unwrap();

        let stored = repo.get(&cancel, "USNYC").await.unwrap();
        assert!(stored.alias().is_empty());
        assert!(stored.coordinates().is_empty());
        assert!(stored.unlocs().is_empty());
    }

    #[tokio::test]
    async fn test_renaming_a_fetched_copy_does_not_touch_the_store() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();
        let port = random_port();
        repo.upsert(&cancel, Some(port.clone())).await.unwrap();

        let mut fetched = repo.get(&cancel, port.id()).await.unwrap();
        fetched.rename("updated name").unwrap();

        let again = repo.get(&cancel, port.id()).await.unwrap();
        assert_eq!(again.name(), port.name());
        assert_ne!(again, fetched);
    }

    #[tokio::test]
    async fn test_returned_copy_survives_later_writes() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();
        repo.upsert(&cancel, Some(new_york())).await.unwrap();

        let held = repo.get(&cancel, "USNYC").await.unwrap();
        repo.delete_all(&cancel).await.unwrap();

        assert_eq!(held.alias(), &["NYC".to_string()]);
    }

    #[tokio::test]
    async fn test_nil_port() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();

        let err = repo.upsert(&cancel, None).await.unwrap_err();
        assert_eq!(err, DomainError::NilRecord);
    }

    #[tokio::test]
    async fn test_get_on_empty_store() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();

        let err = repo.get(&cancel, "USNYC").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(repo.count(&cancel).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();
        let port = random_port();
        repo.upsert(&cancel, Some(port.clone())).await.unwrap();

        repo.delete_by_id(&cancel, port.id()).await.unwrap();

        assert!(repo.get(&cancel, port.id()).await.unwrap_err().is_not_found());
        assert!(repo
            .delete_by_id(&cancel, port.id())
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let repo = InMemoryPortRepository::new();
        let cancel = CancellationToken::new();
        for _ in 0..10 {
            repo.upsert(&cancel, Some(random_port())).await.unwrap();
        }
        assert_eq!(repo.count(&cancel).await.unwrap(), 10);

        repo.delete_all(&cancel).await.unwrap();
        assert_eq!(repo.count(&cancel).await.unwrap(), 0);

        // Emptying an empty store is fine too
        repo.delete_all(&cancel).await.unwrap();
        assert_eq!(repo.count(&cancel).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let repo = InMemoryPortRepository::new();
        let live = CancellationToken::new();
        repo.upsert(&live, Some(new_york())).await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(
            repo.upsert(&cancel, Some(random_port())).await.unwrap_err(),
            DomainError::Cancelled
        );
        assert_eq!(
            repo.get(&cancel, "USNYC").await.unwrap_err(),
            DomainError::Cancelled
        );
        assert_eq!(
            repo.count(&cancel).await.unwrap_err(),
            DomainError::Cancelled
        );
        assert_eq!(
            repo.delete_by_id(&cancel, "USNYC").await.unwrap_err(),
            DomainError::Cancelled
        );
        assert_eq!(
            repo.delete_all(&cancel).await.unwrap_err(),
            DomainError::Cancelled
        );

        assert_eq!(repo.count(&live).await.unwrap(), 1);
    }

    fn tagged_port(tag: &str) -> Port {
        Port::from_fields(PortFields {
            id: "SHARED".to_string(),
            name: tag.to_string(),
            code: tag.to_string(),
            city: tag.to_string(),
            country: tag.to_string(),
            alias: vec![tag.to_string(); 4],
            province: tag.to_string(),
            timezone: tag.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_reads_never_see_mixed_records() {
        let repo = Arc::new(InMemoryPortRepository::new());
        let cancel = CancellationToken::new();
        repo.upsert(&cancel, Some(tagged_port("a"))).await.unwrap();

        let mut handles = Vec::new();
        for writer in 0..4 {
            let repo = repo.clone();
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200 {
                    let tag = if (i + writer) % 2 == 0 { "a" } else { "b" };
                    repo.upsert(&cancel, Some(tagged_port(tag))).await.unwrap();
                }
            }));
        }
        for _ in 0..4 {
            let repo = repo.clone();
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let port = repo.get(&cancel, "SHARED").await.unwrap();
                    let tag = port.name().to_string();
                    assert_eq!(port.code(), tag);
                    assert_eq!(port.city(), tag);
                    assert_eq!(port.country(), tag);
                    assert_eq!(port.province(), tag);
                    assert_eq!(port.timezone(), tag);
                    assert!(port.alias().iter().all(|a| *a == tag));
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(repo.count(&cancel).await.unwrap(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_delete_all_is_atomic_for_readers() {
        let repo = Arc::new(InMemoryPortRepository::new());
        let cancel = CancellationToken::new();
        for _ in 0..50 {
            repo.upsert(&cancel, Some(random_port())).await.unwrap();
        }

        let reader = {
            let repo = repo.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    let count = repo.count(&cancel).await.unwrap();
                    assert!(count == 50 || count == 0, "saw partial count {}", count);
                }
            })
        };

        repo.delete_all(&cancel).await.unwrap();
        reader.await.unwrap();
        assert_eq!(repo.count(&cancel).await.unwrap(), 0);
    }
}
