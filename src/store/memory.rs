//! In-memory store backend.
//!
//! # Purpose
//! Mirrors the durable backend's transaction semantics over a
//! mutex-guarded map. Used by tests and by ephemeral deployments that do
//! not need flags to survive a restart.
//!
//! # Notes
//! A write transaction holds the map lock for its whole lifetime and
//! stages changes in a private copy, so writers serialize and uncommitted
//! changes are never observed.
use crate::model::FeatureFlag;
use crate::store::{FeatureStore, ReadTx, StoreError, StoreResult, WriteTx};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type FlagMap = BTreeMap<String, FeatureFlag>;

#[derive(Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<FlagMap>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeatureStore for InMemoryStore {
    async fn begin_read(&self) -> StoreResult<Box<dyn ReadTx>> {
        let snapshot = self.inner.lock().await.clone();
        Ok(Box::new(MemoryReadTx { snapshot }))
    }

    async fn begin_write(&self) -> StoreResult<Box<dyn WriteTx>> {
        let guard = self.inner.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryWriteTx { guard, staged }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        let _ = self.inner.lock().await;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryReadTx {
    snapshot: FlagMap,
}

impl ReadTx for MemoryReadTx {
    fn get(&self, key: &str) -> StoreResult<FeatureFlag> {
        lookup(&self.snapshot, key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.snapshot.contains_key(key))
    }

    fn list(&self) -> StoreResult<Vec<FeatureFlag>> {
        Ok(self.snapshot.values().cloned().collect())
    }
}

struct MemoryWriteTx {
    guard: OwnedMutexGuard<FlagMap>,
    staged: FlagMap,
}

impl ReadTx for MemoryWriteTx {
    fn get(&self, key: &str) -> StoreResult<FeatureFlag> {
        lookup(&self.staged, key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.staged.contains_key(key))
    }

    fn list(&self) -> StoreResult<Vec<FeatureFlag>> {
        Ok(self.staged.values().cloned().collect())
    }
}

impl WriteTx for MemoryWriteTx {
    fn put(&mut self, flag: &FeatureFlag) -> StoreResult<()> {
        self.staged.insert(flag.key.clone(), flag.clone());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        match self.staged.remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(key.to_string())),
        }
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        *self.guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}

fn lookup(map: &FlagMap, key: &str) -> StoreResult<FeatureFlag> {
    map.get(key)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(key.to_string()))
}
