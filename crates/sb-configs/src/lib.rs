//! # sb-configs
//!
//! Runtime configuration for the signboard binary.
//!
//! Layers, later ones winning:
//! 1. built-in defaults
//! 2. `signboard.toml` (or the file named by `SIGNBOARD_CONFIG`), when present
//! 3. `SIGNBOARD__*` environment variables, `__` separating nested keys
//!    (e.g. `SIGNBOARD__STORE__BACKEND=sqlite`)
//!
//! A `.env` file is loaded into the environment first.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, Map};
use sb_core::models::Role;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "SIGNBOARD";
const DEFAULT_FILE: &str = "signboard.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Json,
    Sqlite,
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Directory for `json`, connection URL for `sqlite`, unused for `memory`
    pub path: String,
}

/// An account seeded into an empty registry.
#[derive(Debug, Deserialize)]
pub struct AccountConfig {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    /// Simulated round-trip delay of repository and login calls
    pub latency_ms: u64,
    /// Seed the demo announcements when the store holds none
    pub seed_demo: bool,
    /// Fallback tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
    #[serde(default = "demo_accounts")]
    pub accounts: Vec<AccountConfig>,
}

impl AppConfig {
    /// Loads `.env`, then the layered sources from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), ".env loaded");
        }
        let file = std::env::var_os("SIGNBOARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));
        Self::from_sources(Some(&file), None)
    }

    /// Builds the layered configuration. `env` replaces the process environment
    /// when given.
    pub fn from_sources(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("store.backend", "json")?
            .set_default("store.path", "./data/store")?
            .set_default("latency_ms", 1000)?
            .set_default("seed_demo", true)?
            .set_default("log_filter", "info")?;

        if let Some(file) = file {
            builder = builder.add_source(File::from(file).required(false));
        }

        let cfg: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend != StoreBackend::Memory && self.store.path.trim().is_empty() {
            return Err(ConfigError::Invalid("store.path must be set".into()));
        }
        if cfg!(not(feature = "store-sqlite")) && self.store.backend == StoreBackend::Sqlite {
            return Err(ConfigError::Invalid(
                "sqlite backend requested but this build lacks the store-sqlite feature".into(),
            ));
        }
        if self.accounts.is_empty() {
            return Err(ConfigError::Invalid("at least one account must be configured".into()));
        }
        Ok(())
    }
}

/// The three demo accounts, one per role.
fn demo_accounts() -> Vec<AccountConfig> {
    [
        ("1", "admin@example.com", "Admin User", Role::Admin, "admin123"),
        ("2", "director@example.com", "Director User", Role::Director, "director123"),
        ("3", "designer@example.com", "Designer User", Role::Designer, "designer123"),
    ]
    .into_iter()
    .map(|(id, email, name, role, password)| AccountConfig {
        id: id.into(),
        email: email.into(),
        name: name.into(),
        role,
        password: SecretString::from(password.to_string()),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn defaults_without_file_or_env() {
        let cfg = AppConfig::from_sources(None, env(&[])).unwrap();
        assert_eq!(cfg.store.backend, StoreBackend::Json);
        assert_eq!(cfg.store.path, "./data/store");
        assert_eq!(cfg.latency(), Duration::from_millis(1000));
        assert!(cfg.seed_demo);
        assert_eq!(cfg.accounts.len(), 3);
        assert_eq!(cfg.accounts[1].role, Role::Director);
        assert_eq!(cfg.accounts[1].password.expose_secret(), "director123");
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
latency_ms = 250
log_filter = "debug"

[store]
backend = "memory"
path = ""

[[accounts]]
id = "9"
email = "ops@example.com"
name = "Ops"
role = "admin"
password = "opsops"
"#
        )
        .unwrap();

        let cfg = AppConfig::from_sources(
            Some(file.path()),
            env(&[("SIGNBOARD__LATENCY_MS", "0"), ("SIGNBOARD__SEED_DEMO", "false")]),
        )
        .unwrap();

        assert_eq!(cfg.store.backend, StoreBackend::Memory);
        assert_eq!(cfg.latency(), Duration::ZERO);
        assert!(!cfg.seed_demo);
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.accounts.len(), 1);
        assert_eq!(cfg.accounts[0].email, "ops@example.com");
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let cfg = AppConfig::from_sources(Some(Path::new("/nonexistent/signboard.toml")), env(&[]));
        assert!(cfg.is_ok());
    }

    #[test]
    fn blank_store_path_is_rejected() {
        let err = AppConfig::from_sources(None, env(&[("SIGNBOARD__STORE__PATH", " ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
