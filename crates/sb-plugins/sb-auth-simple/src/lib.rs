//! # sb-auth-simple
//!
//! Argon2-based implementation of `IdentityProvider`.
//! Accounts live in the key-value store under `users` with PHC password hashes;
//! the open session is kept under `user` so a restarted display stays signed in.

use std::sync::Arc;
use std::time::Duration;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use sb_core::error::{AppError, Result};
use sb_core::models::{Principal, Role};
use sb_core::policy;
use sb_core::traits::{keys, IdentityProvider, KeyValueStore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// An account provisioned from configuration when no registry exists yet.
#[derive(Debug)]
pub struct SeedAccount {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: SecretString,
}

/// Input of the "create user" admin action.
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub role: Role,
}

/// Stored form of an account. Never leaves this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    id: String,
    email: String,
    name: String,
    role: Role,
    password_hash: String,
}

impl Account {
    fn principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

pub struct SimpleIdentityProvider {
    store: Arc<dyn KeyValueStore>,
    accounts: RwLock<Vec<Account>>,
    session: RwLock<Option<Principal>>,
    latency: Duration,
}

impl SimpleIdentityProvider {
    /// Loads the account registry, seeding it from `seeds` on first start, and
    /// restores a persisted session whose account still exists.
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        seeds: Vec<SeedAccount>,
        latency: Duration,
    ) -> Result<Self> {
        let accounts = match store.get(keys::USERS).await.map_err(AppError::internal)? {
            Some(json) => serde_json::from_str::<Vec<Account>>(&json)?,
            None => {
                let mut accounts = Vec::with_capacity(seeds.len());
                for seed in seeds {
                    accounts.push(Account {
                        password_hash: hash_password(seed.password).await?,
                        id: seed.id,
                        email: normalize_email(&seed.email),
                        name: seed.name,
                        role: seed.role,
                    });
                }
                store
                    .put(keys::USERS, serde_json::to_string(&accounts)?)
                    .await
                    .map_err(AppError::internal)?;
                tracing::info!(accounts = accounts.len(), "account registry seeded");
                accounts
            }
        };

        let session = match store.get(keys::SESSION).await.map_err(AppError::internal)? {
            Some(json) => {
                let principal: Principal = serde_json::from_str(&json)?;
                accounts.iter().any(|a| a.id == principal.id).then_some(principal)
            }
            None => None,
        };
        if let Some(principal) = &session {
            tracing::info!(principal = %principal.id, "session restored");
        }

        Ok(Self {
            store,
            accounts: RwLock::new(accounts),
            session: RwLock::new(session),
            latency,
        })
    }

    /// Adds an account. Admin only; the email must not be taken.
    pub async fn register(&self, actor: &Principal, account: NewAccount) -> Result<Principal> {
        if !policy::can_administer(actor.role) {
            return Err(AppError::Forbidden(format!("{} may not create accounts", actor.role)));
        }
        let name = account.name.trim().to_string();
        let email = normalize_email(&account.email);
        if name.chars().count() < 3 {
            return Err(AppError::ValidationError("name must be at least 3 characters".into()));
        }
        if !email.contains('@') {
            return Err(AppError::ValidationError(format!("invalid email: {email}")));
        }
        if account.password.expose_secret().chars().count() < 6 {
            return Err(AppError::ValidationError("password must be at least 6 characters".into()));
        }

        let password_hash = hash_password(account.password).await?;

        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == email) {
            return Err(AppError::Conflict(format!("an account for {email} already exists")));
        }
        let created = Account {
            id: uuid::Uuid::now_v7().to_string(),
            email,
            name,
            role: account.role,
            password_hash,
        };

        let mut next = accounts.clone();
        next.push(created.clone());
        self.store
            .put(keys::USERS, serde_json::to_string(&next)?)
            .await
            .map_err(AppError::internal)?;
        *accounts = next;

        tracing::info!(actor = %actor.id, account = %created.id, role = %created.role, "account registered");
        Ok(created.principal())
    }

    /// Every known principal, without credentials.
    pub async fn principals(&self) -> Vec<Principal> {
        self.accounts.read().await.iter().map(Account::principal).collect()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl IdentityProvider for SimpleIdentityProvider {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal> {
        self.simulate_latency().await;

        let email = normalize_email(email);
        let account = self
            .accounts
            .read()
            .await
            .iter()
            .find(|a| a.email == email)
            .cloned();
        let Some(account) = account else {
            tracing::warn!(%email, "login rejected: unknown email");
            return Err(AppError::Unauthorized("invalid email or password".into()));
        };

        if !verify_password(password.to_string(), account.password_hash.clone()).await? {
            tracing::warn!(%email, "login rejected: wrong password");
            return Err(AppError::Unauthorized("invalid email or password".into()));
        }

        let principal = account.principal();
        self.store
            .put(keys::SESSION, serde_json::to_string(&principal)?)
            .await
            .map_err(AppError::internal)?;
        *self.session.write().await = Some(principal.clone());

        tracing::info!(principal = %principal.id, role = %principal.role, "signed in");
        Ok(principal)
    }

    async fn current_principal(&self) -> Option<Principal> {
        self.session.read().await.clone()
    }

    async fn logout(&self) -> Result<()> {
        let mut session = self.session.write().await;
        if session.is_none() {
            return Ok(());
        }
        self.store.remove(keys::SESSION).await.map_err(AppError::internal)?;
        if let Some(principal) = session.take() {
            tracing::info!(principal = %principal.id, "signed out");
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Argon2id with a fresh salt, encoded as a PHC string. Runs off the async workers.
async fn hash_password(password: SecretString) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(AppError::internal)
    })
    .await
    .map_err(AppError::internal)?
}

/// `Ok(false)` on mismatch; a malformed stored hash is an internal error.
async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(AppError::internal)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(AppError::internal)?
}
