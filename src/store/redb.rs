//! Durable store backend over the redb embedded engine.
//!
//! # Purpose
//! Persists each flag as a UTF-8 JSON document in a single `features`
//! table keyed by the flag key. The table is created when the database is
//! opened, so transactions never observe a missing table.
//!
//! # Notes
//! redb serializes write transactions internally; `begin_write` may block
//! briefly while another writer commits, which is the store's own
//! timeout/locking policy rather than ours.
use crate::model::FeatureFlag;
use crate::store::{FeatureStore, ReadTx, StoreError, StoreResult, WriteTx};
use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;

const FEATURES: TableDefinition<&str, &[u8]> = TableDefinition::new("features");

pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open (or create) the database file and ensure the features table
    /// exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path).map_err(unexpected)?;
        let tx = db.begin_write().map_err(unexpected)?;
        tx.open_table(FEATURES).map_err(unexpected)?;
        tx.commit().map_err(unexpected)?;
        Ok(Self { db })
    }
}

#[async_trait]
impl FeatureStore for RedbStore {
    async fn begin_read(&self) -> StoreResult<Box<dyn ReadTx>> {
        let tx = self.db.begin_read().map_err(unexpected)?;
        Ok(Box::new(RedbReadTx { tx }))
    }

    async fn begin_write(&self) -> StoreResult<Box<dyn WriteTx>> {
        let tx = self.db.begin_write().map_err(unexpected)?;
        Ok(Box::new(RedbWriteTx { tx }))
    }

    async fn health_check(&self) -> StoreResult<()> {
        let tx = self.db.begin_read().map_err(unexpected)?;
        tx.open_table(FEATURES).map_err(unexpected)?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "redb"
    }
}

struct RedbReadTx {
    tx: redb::ReadTransaction,
}

impl ReadTx for RedbReadTx {
    fn get(&self, key: &str) -> StoreResult<FeatureFlag> {
        let table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        read_flag(&table, key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        Ok(table.get(key).map_err(unexpected)?.is_some())
    }

    fn list(&self) -> StoreResult<Vec<FeatureFlag>> {
        let table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        list_flags(&table)
    }
}

struct RedbWriteTx {
    tx: redb::WriteTransaction,
}

impl ReadTx for RedbWriteTx {
    fn get(&self, key: &str) -> StoreResult<FeatureFlag> {
        let table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        read_flag(&table, key)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        let found = table.get(key).map_err(unexpected)?.is_some();
        Ok(found)
    }

    fn list(&self) -> StoreResult<Vec<FeatureFlag>> {
        let table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        list_flags(&table)
    }
}

impl WriteTx for RedbWriteTx {
    fn put(&mut self, flag: &FeatureFlag) -> StoreResult<()> {
        let bytes = serde_json::to_vec(flag)
            .map_err(|err| StoreError::Unexpected(anyhow::Error::new(err)))?;
        let mut table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        table
            .insert(flag.key.as_str(), bytes.as_slice())
            .map_err(unexpected)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StoreResult<()> {
        let mut table = self.tx.open_table(FEATURES).map_err(unexpected)?;
        let removed = table.remove(key).map_err(unexpected)?.is_some();
        if removed {
            Ok(())
        } else {
            Err(StoreError::NotFound(key.to_string()))
        }
    }

    fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().map_err(unexpected)
    }
}

fn read_flag(table: &impl ReadableTable<&'static str, &'static [u8]>, key: &str) -> StoreResult<FeatureFlag> {
    match table.get(key).map_err(unexpected)? {
        Some(guard) => decode(guard.value()),
        None => Err(StoreError::NotFound(key.to_string())),
    }
}

fn list_flags(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
) -> StoreResult<Vec<FeatureFlag>> {
    let mut flags = Vec::new();
    for entry in table.iter().map_err(unexpected)? {
        let (_, value) = entry.map_err(unexpected)?;
        flags.push(decode(value.value())?);
    }
    Ok(flags)
}

fn decode(bytes: &[u8]) -> StoreResult<FeatureFlag> {
    serde_json::from_slice(bytes).map_err(|err| StoreError::Unexpected(anyhow::Error::new(err)))
}

fn unexpected(err: impl std::error::Error + Send + Sync + 'static) -> StoreError {
    StoreError::Unexpected(anyhow::Error::new(err))
}
