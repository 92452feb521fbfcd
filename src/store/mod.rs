//! Persistence contract for feature flags.
//!
//! # Purpose
//! Defines the capability interface the service layer depends on: a store
//! hands out atomic transactions, and every read or mutation happens
//! inside exactly one of them. The embedded engine behind the trait is
//! swappable without touching the service or the evaluator.
use crate::model::FeatureFlag;
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod redb;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("feature not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read operations available inside any open transaction.
pub trait ReadTx: Send {
    /// Fetch one flag; `NotFound` when the key is absent.
    fn get(&self, key: &str) -> StoreResult<FeatureFlag>;
    /// Existence probe; absence is a valid `false`, not a failure.
    fn exists(&self, key: &str) -> StoreResult<bool>;
    /// Full scan in the store's key order.
    fn list(&self) -> StoreResult<Vec<FeatureFlag>>;
}

/// A read-write transaction. Writes become visible to other transactions
/// only after `commit`; dropping the transaction discards them.
pub trait WriteTx: ReadTx {
    /// Upsert; overwrites any existing record with the same key.
    fn put(&mut self, flag: &FeatureFlag) -> StoreResult<()>;
    /// Delete; `NotFound` when the key is absent.
    fn delete(&mut self, key: &str) -> StoreResult<()>;
    fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Key-addressed flag storage backed by a transactional engine.
///
/// Write transactions serialize against each other, so a read-modify-write
/// sequence inside one transaction cannot lose updates.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    async fn begin_read(&self) -> StoreResult<Box<dyn ReadTx>>;
    async fn begin_write(&self) -> StoreResult<Box<dyn WriteTx>>;
    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
