//! # Signboard Binary
//!
//! Assembles the display from compile-time features and runs the scheduler
//! until interrupted.

use std::sync::Arc;

use anyhow::Context;
use sb_configs::{AppConfig, StoreBackend, StoreConfig};
use sb_core::models::AnnouncementStatus;
use sb_core::traits::{IdentityProvider, KeyValueStore};
use sb_services::{AnnouncementRepository, DisplayScheduler, RepositoryOptions, SettingsService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "store-local")]
use sb_store_local::{JsonFileStore, MemoryStore};

#[cfg(feature = "store-sqlite")]
use sb_store_sqlite::SqliteStore;

#[cfg(feature = "auth-simple")]
use sb_auth_simple::{SeedAccount, SimpleIdentityProvider};

#[cfg(not(feature = "auth-simple"))]
compile_error!("signboard needs an identity provider; enable the `auth-simple` feature");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let latency = config.latency();

    // 1. Persistence backend
    let store = open_store(&config.store).await?;

    // 2. Identity
    let seeds = config
        .accounts
        .into_iter()
        .map(|a| SeedAccount {
            id: a.id,
            email: a.email,
            name: a.name,
            role: a.role,
            password: a.password,
        })
        .collect();
    let identity = SimpleIdentityProvider::load(store.clone(), seeds, latency).await?;
    match identity.current_principal().await {
        Some(principal) => info!(principal = %principal.email, role = %principal.role, "session restored"),
        None => info!("no open session; the display runs unattended"),
    }

    // 3. Services
    let repo = Arc::new(
        AnnouncementRepository::load(
            store.clone(),
            RepositoryOptions {
                latency,
                seed_demo: config.seed_demo,
            },
        )
        .await?,
    );
    let stats = repo.stats().await;
    info!(
        total = stats.total,
        pending = stats.count(AnnouncementStatus::Pending),
        published = stats.count(AnnouncementStatus::Published),
        "announcements loaded"
    );

    let settings = Arc::new(SettingsService::new(store));
    let mut scheduler = DisplayScheduler::new(repo, settings);

    // 4. Display loop
    let mut slides = scheduler.subscribe();
    let display = tokio::spawn(async move {
        while slides.changed().await.is_ok() {
            let current = slides.borrow_and_update().clone();
            match current {
                Some(slide) => info!(
                    slide = slide.index + 1,
                    of = slide.total,
                    seconds = slide.duration.as_secs(),
                    title = %slide.announcement.title,
                    "now showing"
                ),
                None => info!("no published announcements to show"),
            }
        }
    });

    scheduler.activate().await?;
    info!(backend = ?config.store.backend, "signboard running; ctrl-c to stop");

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    scheduler.deactivate();
    display.abort();
    info!("signboard stopped");
    Ok(())
}

async fn open_store(cfg: &StoreConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    match cfg.backend {
        #[cfg(feature = "store-local")]
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "store-local")]
        StoreBackend::Json => Ok(Arc::new(JsonFileStore::open(&cfg.path).await?)),
        #[cfg(feature = "store-sqlite")]
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::new(&cfg.path).await?)),
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("store backend {other:?} is not compiled into this build"),
    }
}
