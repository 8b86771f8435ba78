use crate::domain::models::UserStatus;
use crate::domain::repository::UserRegistry;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryUserRegistry {
    storage: Arc<RwLock<HashMap<String, UserStatus>>>,
}

impl InMemoryUserRegistry {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    #[instrument(skip(self), fields(email = email))]
    async fn upsert(&self, email: &str) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage.insert(email.to_string(), UserStatus { reminders: true });
        debug!(email = email, "User upserted with reminders enabled");
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn disable(&self, email: &str) -> Result<bool> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        match storage.get_mut(email) {
            Some(status) => {
                status.reminders = false;
                debug!(email = email, "Reminders disabled for user");
                Ok(true)
            }
            None => {
                trace!(email = email, "User not found in storage");
                Ok(false)
            }
        }
    }

    #[instrument(skip(self))]
    async fn snapshot(&self) -> Result<HashMap<String, UserStatus>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        debug!(count = storage.len(), "Registry snapshot taken");
        Ok(storage.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_enables_reminders() {
        let registry = InMemoryUserRegistry::new();

        registry.upsert("alice@example.com").await.unwrap();

        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(
            snapshot.get("alice@example.com"),
            Some(&UserStatus { reminders: true })
        );
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let registry = InMemoryUserRegistry::new();

        registry.upsert("alice@example.com").await.unwrap();
        registry.upsert("alice@example.com").await.unwrap();

        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_reenables_after_disable() {
        let registry = InMemoryUserRegistry::new();

        registry.upsert("alice@example.com").await.unwrap();
        assert!(registry.disable("alice@example.com").await.unwrap());
        registry.upsert("alice@example.com").await.unwrap();

        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(
            snapshot.get("alice@example.com"),
            Some(&UserStatus { reminders: true })
        );
    }

    #[tokio::test]
    async fn test_disable_sets_flag_visible_in_snapshot() {
        let registry = InMemoryUserRegistry::new();

        registry.upsert("a@x.com").await.unwrap();
        assert!(registry.disable("a@x.com").await.unwrap());

        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(snapshot.get("a@x.com"), Some(&UserStatus { reminders: false }));
    }

    #[tokio::test]
    async fn test_disable_unknown_email_returns_false() {
        let registry = InMemoryUserRegistry::new();

        let found = registry.disable("nobody@example.com").await.unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn test_snapshot_is_a_detached_copy() {
        let registry = InMemoryUserRegistry::new();

        registry.upsert("alice@example.com").await.unwrap();
        let before = registry.snapshot().await.unwrap();
        registry.disable("alice@example.com").await.unwrap();

        // Mutation after the snapshot must not leak into the copy.
        assert_eq!(
            before.get("alice@example.com"),
            Some(&UserStatus { reminders: true })
        );
    }

    #[tokio::test]
    async fn test_concurrent_upserts() {
        let registry = InMemoryUserRegistry::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry_clone = registry.clone();
                tokio::spawn(async move {
                    registry_clone.upsert(&format!("user{}@example.com", i)).await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        let snapshot = registry.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 10);
        for i in 0..10 {
            assert_eq!(
                snapshot.get(&format!("user{}@example.com", i)),
                Some(&UserStatus { reminders: true })
            );
        }
    }

    #[tokio::test]
    async fn test_concurrent_snapshots_during_mutation() {
        let registry = InMemoryUserRegistry::new();
        registry.upsert("seed@example.com").await.unwrap();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let registry_clone = registry.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        registry_clone.upsert(&format!("user{}@example.com", i)).await?;
                    }
                    registry_clone.snapshot().await
                })
            })
            .collect();

        for handle in handles {
            let snapshot = handle.await.unwrap().unwrap();
            // Every observed key was upserted at some prior instant.
            assert!(snapshot.contains_key("seed@example.com"));
        }
    }
}
