//! flagd HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, and the HTTP router, then serves the API
//! until SIGINT.
//!
//! # Notes
//! The `build_state` and `run_with_shutdown` helpers keep wiring testable
//! and the main setup logic minimal.
use anyhow::Context;
use flagd::app::{build_router, AppState};
use flagd::config::{ServiceConfig, StoreBackend};
use flagd::observability;
use flagd::service::FeatureService;
use flagd::store::memory::InMemoryStore;
use flagd::store::redb::RedbStore;
use flagd::store::FeatureStore;
use std::future::Future;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env_or_yaml().context("flagd config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ServiceConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let state = build_state(&config)?;
    tracing::info!(
        backend = state.features.backend_name(),
        durable = state.features.is_durable(),
        "store ready"
    );

    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "flagd listening");
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    metrics_task.abort();
    Ok(())
}

fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn FeatureStore> = match config.store_backend {
        StoreBackend::Memory => Arc::new(InMemoryStore::new()),
        StoreBackend::Redb => Arc::new(
            RedbStore::open(&config.db_path)
                .with_context(|| format!("open {}", config.db_path.display()))?,
        ),
    };
    Ok(AppState {
        api_version: "v1".to_string(),
        features: FeatureService::new(store),
    })
}
