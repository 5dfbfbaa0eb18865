//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Principal;

/// Keys under which the services keep their collections.
pub mod keys {
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const DISPLAY_SETTINGS: &str = "displaySettings";
    pub const USERS: &str = "users";
    /// The signed-in principal, restored on start-up
    pub const SESSION: &str = "user";
}

/// Durable string-keyed store holding serialized collections.
///
/// Values are whole documents: `put` replaces everything stored under the key.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()>;
    /// Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> anyhow::Result<()>;
}

/// Identity contract: credential check plus the current session.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verifies credentials and opens a session for the matching principal.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal>;

    /// The principal of the open session, if any.
    async fn current_principal(&self) -> Option<Principal>;

    /// Closes the open session. A no-op when nobody is signed in.
    async fn logout(&self) -> Result<()>;
}
