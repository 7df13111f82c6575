//! Secret metadata lookup.
//!
//! The pipeline only needs a keyed lookup; storage technology, table layout and
//! migrations belong to the implementation. [`InMemorySecretRepository`] is a
//! process-local implementation for development and tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use vault_common::SecretRecord;

use crate::context::CallContext;

/// Keyed lookup of secret records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// Load the record whose logical key is `key`.
    ///
    /// `Ok(None)` means not found and is distinct from a lookup failure.
    async fn get_secret(&self, ctx: &CallContext, key: &str)
        -> anyhow::Result<Option<SecretRecord>>;
}

/// [`SecretRepository`] backed by a `HashMap` keyed by record key.
#[derive(Debug, Default)]
pub struct InMemorySecretRepository {
    records: RwLock<HashMap<String, SecretRecord>>,
}

impl InMemorySecretRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `record` under its own key.
    pub fn put(&self, record: SecretRecord) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.key.clone(), record);
    }

    /// Remove and return the record stored under `key`.
    pub fn remove(&self, key: &str) -> Option<SecretRecord> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SecretRepository for InMemorySecretRepository {
    async fn get_secret(
        &self,
        _ctx: &CallContext,
        key: &str,
    ) -> anyhow::Result<Option<SecretRecord>> {
        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_common::Store;

    fn record(key: &str) -> SecretRecord {
        SecretRecord {
            key: key.into(),
            store: Store::DsVault,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let repo = InMemorySecretRepository::new();
        let got = repo
            .get_secret(&CallContext::background(), "missing/key")
            .await
            .unwrap();
        assert!(got.is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn put_then_get() {
        let repo = InMemorySecretRepository::new();
        repo.put(record("/ds/vault/a"));
        let got = repo
            .get_secret(&CallContext::background(), "/ds/vault/a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(got.key, "/ds/vault/a");
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn put_replaces_and_remove_deletes() {
        let repo = InMemorySecretRepository::new();
        repo.put(record("k"));
        let mut updated = record("k");
        updated.version = "v2".into();
        repo.put(updated);
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.remove("k").unwrap().version, "v2");
        assert!(repo.remove("k").is_none());
    }
}
