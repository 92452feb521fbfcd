use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

// Service configuration sourced from environment variables, with an
// optional YAML override file.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub db_path: PathBuf,
    pub store_backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Redb,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value {
            "redb" => Ok(StoreBackend::Redb),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("unknown store backend: {other}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ServiceConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    db_path: Option<PathBuf>,
    store_backend: Option<String>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("FLAGD_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .with_context(|| "parse FLAGD_BIND")?;
        let metrics_bind = std::env::var("FLAGD_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse FLAGD_METRICS_BIND")?;
        let db_path =
            PathBuf::from(std::env::var("FLAGD_DB_PATH").unwrap_or_else(|_| "flagd.redb".to_string()));
        let store_backend = StoreBackend::parse(
            &std::env::var("FLAGD_STORE_BACKEND").unwrap_or_else(|_| "redb".to_string()),
        )
        .with_context(|| "parse FLAGD_STORE_BACKEND")?;
        Ok(Self {
            bind_addr,
            metrics_bind,
            db_path,
            store_backend,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("FLAGD_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read FLAGD_CONFIG: {path}"))?;
            let override_cfg: ServiceConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse flagd config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.db_path {
                config.db_path = value;
            }
            if let Some(value) = override_cfg.store_backend {
                config.store_backend = StoreBackend::parse(&value)?;
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        for key in [
            "FLAGD_BIND",
            "FLAGD_METRICS_BIND",
            "FLAGD_DB_PATH",
            "FLAGD_STORE_BACKEND",
            "FLAGD_CONFIG",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_env() {
        clear_env();
        let config = ServiceConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.metrics_bind, "0.0.0.0:9090".parse().unwrap());
        assert_eq!(config.db_path, PathBuf::from("flagd.redb"));
        assert_eq!(config.store_backend, StoreBackend::Redb);
    }

    #[test]
    #[serial]
    fn yaml_overrides_env_defaults() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "bind_addr: 127.0.0.1:9999\nstore_backend: memory\ndb_path: /tmp/other.redb"
        )
        .expect("write");
        std::env::set_var("FLAGD_CONFIG", file.path());

        let config = ServiceConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr, "127.0.0.1:9999".parse().unwrap());
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.redb"));
        // Untouched fields keep their env defaults.
        assert_eq!(config.metrics_bind, "0.0.0.0:9090".parse().unwrap());

        std::env::remove_var("FLAGD_CONFIG");
    }

    #[test]
    #[serial]
    fn unknown_backend_is_rejected() {
        clear_env();
        std::env::set_var("FLAGD_STORE_BACKEND", "postgres");
        let result = ServiceConfig::from_env();
        std::env::remove_var("FLAGD_STORE_BACKEND");
        assert!(result.is_err());
    }
}
