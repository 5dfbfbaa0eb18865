//! Display settings, stored on their own key next to the announcements.

use std::sync::Arc;

use sb_core::error::{AppError, Result};
use sb_core::models::{DisplaySettings, Principal};
use sb_core::policy;
use sb_core::traits::{keys, KeyValueStore};

pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The saved settings, or the defaults when nothing was saved yet.
    pub async fn load(&self) -> Result<DisplaySettings> {
        match self.store.get(keys::DISPLAY_SETTINGS).await.map_err(AppError::internal)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(DisplaySettings::default()),
        }
    }

    pub async fn save(&self, actor: &Principal, settings: DisplaySettings) -> Result<()> {
        if !policy::can_administer(actor.role) {
            return Err(AppError::Forbidden(format!("{} may not change display settings", actor.role)));
        }
        settings.validate()?;

        self.store
            .put(keys::DISPLAY_SETTINGS, serde_json::to_string(&settings)?)
            .await
            .map_err(AppError::internal)?;

        tracing::info!(
            actor = %actor.id,
            default_duration = settings.default_duration,
            refresh_rate_seconds = settings.refresh_rate_seconds,
            "display settings saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_core::models::Role;
    use sb_store_local::MemoryStore;

    fn admin() -> Principal {
        Principal { id: "1".into(), email: "admin@example.com".into(), name: "Admin".into(), role: Role::Admin }
    }

    #[tokio::test]
    async fn defaults_until_saved() {
        let service = SettingsService::new(Arc::new(MemoryStore::new()));
        assert_eq!(service.load().await.unwrap(), DisplaySettings::default());

        let custom = DisplaySettings { carousel_speed: 3, default_duration: 15, refresh_rate_seconds: 30 };
        service.save(&admin(), custom).await.unwrap();
        assert_eq!(service.load().await.unwrap(), custom);
    }

    #[tokio::test]
    async fn only_valid_settings_from_admins_are_saved() {
        let service = SettingsService::new(Arc::new(MemoryStore::new()));
        let designer = Principal { role: Role::Designer, ..admin() };

        let err = service.save(&designer, DisplaySettings::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let broken = DisplaySettings { refresh_rate_seconds: 0, ..DisplaySettings::default() };
        let err = service.save(&admin(), broken).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(service.load().await.unwrap(), DisplaySettings::default());
    }
}
