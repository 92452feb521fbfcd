//! Feature-flag service operations.
//!
//! # Purpose
//! Orchestrates validation and the store to implement create, read,
//! update-with-merge, delete, and existence semantics. This is the only
//! component that opens store transactions: every operation runs inside
//! exactly one, so concurrent updates of the same key cannot lose writes.
use crate::model::{FeatureFlag, ValidationError};
use crate::store::{FeatureStore, StoreError};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("feature not found: {0}")]
    NotFound(String),
    #[error("feature already exists: {0}")]
    AlreadyExists(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => ServiceError::NotFound(key),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service facade over a swappable flag store.
#[derive(Clone)]
pub struct FeatureService {
    store: Arc<dyn FeatureStore>,
}

impl FeatureService {
    pub fn new(store: Arc<dyn FeatureStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub fn is_durable(&self) -> bool {
        self.store.is_durable()
    }

    pub async fn health_check(&self) -> ServiceResult<()> {
        self.store.health_check().await?;
        Ok(())
    }

    /// Store a new flag. The existence check and the write share one
    /// transaction, which is the uniqueness guarantee.
    pub async fn add_feature(&self, flag: FeatureFlag) -> ServiceResult<FeatureFlag> {
        flag.validate()?;
        let mut tx = self.store.begin_write().await?;
        if tx.exists(&flag.key)? {
            return Err(ServiceError::AlreadyExists(flag.key));
        }
        tx.put(&flag)?;
        tx.commit()?;
        metrics::counter!("flagd_feature_mutations_total", "op" => "created").increment(1);
        Ok(flag)
    }

    pub async fn get_features(&self) -> ServiceResult<Vec<FeatureFlag>> {
        let tx = self.store.begin_read().await?;
        let flags = tx.list()?;
        metrics::gauge!("flagd_features_total").set(flags.len() as f64);
        Ok(flags)
    }

    pub async fn get_feature(&self, key: &str) -> ServiceResult<FeatureFlag> {
        let tx = self.store.begin_read().await?;
        Ok(tx.get(key)?)
    }

    /// Merge an overlay onto the stored flag and write the result back,
    /// all inside one transaction.
    ///
    /// `enabled` is always overwritten; `users` and `groups` only replace
    /// the stored lists when non-empty, and `percentage` only when above
    /// zero. Empty or zero overlay fields mean "unchanged", so this path
    /// cannot clear a list or reset the percentage — intentional policy,
    /// the API cannot distinguish an omitted field from an empty one. The
    /// stored key is never changed.
    pub async fn update_feature(
        &self,
        key: &str,
        overlay: FeatureFlag,
    ) -> ServiceResult<FeatureFlag> {
        let mut tx = self.store.begin_write().await?;
        let mut merged = tx.get(key)?;
        merged.enabled = overlay.enabled;
        if !overlay.users.is_empty() {
            merged.users = overlay.users;
        }
        if !overlay.groups.is_empty() {
            merged.groups = overlay.groups;
        }
        if overlay.percentage > 0 {
            merged.percentage = overlay.percentage;
        }
        // Validate the merged record before any write so an invalid
        // overlay leaves the stored flag untouched.
        merged.validate()?;
        tx.put(&merged)?;
        tx.commit()?;
        metrics::counter!("flagd_feature_mutations_total", "op" => "updated").increment(1);
        Ok(merged)
    }

    /// Delete a flag. Deleting a nonexistent key is an error surfaced as
    /// 404 by the HTTP layer.
    pub async fn remove_feature(&self, key: &str) -> ServiceResult<()> {
        let mut tx = self.store.begin_write().await?;
        tx.delete(key)?;
        tx.commit()?;
        metrics::counter!("flagd_feature_mutations_total", "op" => "deleted").increment(1);
        Ok(())
    }

    pub async fn feature_exists(&self, key: &str) -> ServiceResult<bool> {
        let tx = self.store.begin_read().await?;
        Ok(tx.exists(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn service() -> FeatureService {
        FeatureService::new(Arc::new(InMemoryStore::new()))
    }

    fn dummy() -> FeatureFlag {
        FeatureFlag {
            key: "homepage_v2".to_string(),
            enabled: false,
            users: vec![2],
            groups: vec!["dev".to_string(), "admin".to_string()],
            percentage: 0,
        }
    }

    #[tokio::test]
    async fn add_then_get() {
        let service = service();
        assert!(service.get_features().await.expect("list").is_empty());

        service.add_feature(dummy()).await.expect("add");
        let flags = service.get_features().await.expect("list");
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].key, "homepage_v2");

        let found = service.get_feature("homepage_v2").await.expect("get");
        assert_eq!(found, dummy());
    }

    #[tokio::test]
    async fn duplicate_key_is_rejected() {
        let service = service();
        service.add_feature(dummy()).await.expect("add");
        assert!(matches!(
            service.add_feature(dummy()).await,
            Err(ServiceError::AlreadyExists(key)) if key == "homepage_v2"
        ));
    }

    #[tokio::test]
    async fn invalid_flag_is_rejected_before_write() {
        let service = service();
        let mut flag = dummy();
        flag.percentage = 101;
        assert!(matches!(
            service.add_feature(flag).await,
            Err(ServiceError::Invalid(ValidationError::InvalidPercentage))
        ));
        assert!(!service.feature_exists("homepage_v2").await.expect("exists"));
    }

    #[tokio::test]
    async fn update_replaces_supplied_fields() {
        let service = service();
        service.add_feature(dummy()).await.expect("add");

        let overlay = FeatureFlag {
            key: String::new(),
            enabled: true,
            users: vec![1, 2],
            groups: vec!["a".to_string(), "b".to_string()],
            percentage: 42,
        };
        let merged = service
            .update_feature("homepage_v2", overlay)
            .await
            .expect("update");
        assert_eq!(merged.key, "homepage_v2");
        assert!(merged.enabled);
        assert_eq!(merged.users, vec![1, 2]);
        assert_eq!(merged.groups, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(merged.percentage, 42);

        let stored = service.get_feature("homepage_v2").await.expect("get");
        assert_eq!(stored, merged);
    }

    #[tokio::test]
    async fn update_keeps_empty_overlay_fields_unchanged() {
        let service = service();
        let mut flag = dummy();
        flag.percentage = 20;
        service.add_feature(flag).await.expect("add");

        // enabled is always overwritten, even back to false.
        let overlay = FeatureFlag {
            key: String::new(),
            enabled: false,
            users: vec![],
            groups: vec![],
            percentage: 0,
        };
        let merged = service
            .update_feature("homepage_v2", overlay)
            .await
            .expect("update");
        assert!(!merged.enabled);
        assert_eq!(merged.users, vec![2]);
        assert_eq!(merged.groups, vec!["dev".to_string(), "admin".to_string()]);
        assert_eq!(merged.percentage, 20);
    }

    #[tokio::test]
    async fn invalid_update_leaves_stored_flag_untouched() {
        let service = service();
        service.add_feature(dummy()).await.expect("add");

        let mut overlay = dummy();
        overlay.percentage = 101;
        assert!(matches!(
            service.update_feature("homepage_v2", overlay).await,
            Err(ServiceError::Invalid(ValidationError::InvalidPercentage))
        ));

        let stored = service.get_feature("homepage_v2").await.expect("get");
        assert_eq!(stored, dummy());
    }

    #[tokio::test]
    async fn update_missing_key_is_not_found() {
        let service = service();
        assert!(matches!(
            service.update_feature("missing", dummy()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn remove_and_exists() {
        let service = service();
        service.add_feature(dummy()).await.expect("add");
        assert!(service.feature_exists("homepage_v2").await.expect("exists"));

        service.remove_feature("homepage_v2").await.expect("remove");
        assert!(!service.feature_exists("homepage_v2").await.expect("exists"));

        assert!(matches!(
            service.remove_feature("missing").await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
