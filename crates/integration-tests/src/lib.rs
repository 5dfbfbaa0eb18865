//! Shared fixtures for the end-to-end tests: a fully wired set of services
//! over a chosen store, signed in through the real identity provider.

use std::sync::Arc;
use std::time::Duration;

use sb_auth_simple::{SeedAccount, SimpleIdentityProvider};
use sb_core::models::{Principal, Role};
use sb_core::traits::{IdentityProvider, KeyValueStore};
use sb_services::{AnnouncementRepository, DisplayScheduler, RepositoryOptions, SettingsService};
use secrecy::SecretString;

pub struct Harness {
    pub store: Arc<dyn KeyValueStore>,
    pub identity: SimpleIdentityProvider,
    pub repo: Arc<AnnouncementRepository>,
    pub settings: Arc<SettingsService>,
}

impl Harness {
    /// Wires every service over `store` with no simulated latency.
    pub async fn over(store: Arc<dyn KeyValueStore>, seed_demo: bool) -> Self {
        let identity = SimpleIdentityProvider::load(store.clone(), demo_seeds(), Duration::ZERO)
            .await
            .expect("identity provider");
        let repo = AnnouncementRepository::load(
            store.clone(),
            RepositoryOptions { latency: Duration::ZERO, seed_demo },
        )
        .await
        .expect("repository");
        Self {
            settings: Arc::new(SettingsService::new(store.clone())),
            repo: Arc::new(repo),
            identity,
            store,
        }
    }

    pub fn scheduler(&self) -> DisplayScheduler {
        DisplayScheduler::new(self.repo.clone(), self.settings.clone())
    }

    /// Signs in one of the demo accounts by role.
    pub async fn login(&self, role: Role) -> Principal {
        let (email, password) = match role {
            Role::Admin => ("admin@example.com", "admin123"),
            Role::Director => ("director@example.com", "director123"),
            Role::Designer => ("designer@example.com", "designer123"),
        };
        self.identity.authenticate(email, password).await.expect("demo login")
    }
}

pub fn demo_seeds() -> Vec<SeedAccount> {
    [
        ("1", "admin@example.com", "Admin User", Role::Admin, "admin123"),
        ("2", "director@example.com", "Director User", Role::Director, "director123"),
        ("3", "designer@example.com", "Designer User", Role::Designer, "designer123"),
    ]
    .into_iter()
    .map(|(id, email, name, role, password)| SeedAccount {
        id: id.into(),
        email: email.into(),
        name: name.into(),
        role,
        password: SecretString::from(password.to_string()),
    })
    .collect()
}
