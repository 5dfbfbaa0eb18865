//! # Announcement Repository
//!
//! Owns the canonical collection of announcements and mirrors it into the
//! key-value store after every mutation.
//!
//! Every mutation holds the write lock from validation through the store write,
//! so writes form a single queue and always replace the whole collection. The
//! in-memory collection is swapped only once the store accepted the new one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sb_core::error::{AppError, Result};
use sb_core::models::{
    Announcement, AnnouncementPatch, AnnouncementStatus, DashboardStats, NewAnnouncement, Principal, Role,
};
use sb_core::policy;
use sb_core::traits::{keys, KeyValueStore};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::seed;

/// How many announcements the dashboard lists as recent.
const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct RepositoryOptions {
    /// Simulated round-trip applied before every mutation resolves.
    pub latency: Duration,
    /// Seed the demo announcements when the store holds no collection yet.
    pub seed_demo: bool,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1000),
            seed_demo: false,
        }
    }
}

pub struct AnnouncementRepository {
    store: Arc<dyn KeyValueStore>,
    items: RwLock<Vec<Announcement>>,
    latency: Duration,
}

impl AnnouncementRepository {
    /// Reads the persisted collection, seeding it first if configured to.
    pub async fn load(store: Arc<dyn KeyValueStore>, options: RepositoryOptions) -> Result<Self> {
        let saved = store.get(keys::ANNOUNCEMENTS).await.map_err(AppError::internal)?;

        let items = match saved {
            Some(json) => {
                let items: Vec<Announcement> = serde_json::from_str(&json)?;
                tracing::info!(count = items.len(), "loaded announcements from store");
                items
            }
            None if options.seed_demo => {
                let items = seed::demo_announcements(Utc::now());
                store
                    .put(keys::ANNOUNCEMENTS, serde_json::to_string(&items)?)
                    .await
                    .map_err(AppError::internal)?;
                tracing::info!(count = items.len(), "seeded demo announcements");
                items
            }
            None => Vec::new(),
        };

        Ok(Self {
            store,
            items: RwLock::new(items),
            latency: options.latency,
        })
    }

    /// Opens a new request in `Pending` on behalf of `actor`.
    pub async fn create(&self, actor: &Principal, input: NewAnnouncement) -> Result<Announcement> {
        self.simulate_latency().await;

        if !policy::can_request(actor.role) {
            return Err(AppError::Forbidden(format!("{} may not request announcements", actor.role)));
        }
        let title = required_text("title", &input.title)?;
        let description = required_text("description", &input.description)?;
        let briefing_pdf_name = input
            .briefing_pdf_name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let now = Utc::now();
        let announcement = Announcement {
            id: Uuid::now_v7(),
            title,
            description,
            status: AnnouncementStatus::Pending,
            created_at: now,
            updated_at: now,
            requested_by: actor.id.clone(),
            assigned_to: None,
            image_url: None,
            display_duration: None,
            briefing_pdf_url: briefing_pdf_name.as_ref().map(|name| format!("mock-url/{name}")),
            briefing_pdf_name,
        };

        let mut items = self.items.write().await;
        let mut next = items.clone();
        next.push(announcement.clone());
        self.persist(&next).await?;
        *items = next;

        tracing::info!(id = %announcement.id, requested_by = %actor.id, "announcement created");
        Ok(announcement)
    }

    /// Applies the provided fields of `patch` after checking each against the policy.
    pub async fn update(&self, actor: &Principal, id: Uuid, patch: AnnouncementPatch) -> Result<Announcement> {
        self.simulate_latency().await;

        let mut items = self.items.write().await;
        let index = position(&items, id)?;
        let current = &items[index];

        if let Some(target) = patch.status {
            policy::authorize_status_change(actor.role, current.status, target)?;
        }
        if let Some(url) = &patch.image_url {
            if !policy::can_attach_image(actor.role) {
                return Err(AppError::Forbidden(format!("{} may not attach artwork", actor.role)));
            }
            if url.trim().is_empty() {
                return Err(AppError::ValidationError("image url must not be empty".into()));
            }
        }
        if let Some(seconds) = patch.display_duration {
            if !policy::can_set_duration(actor.role, current) {
                return Err(AppError::Forbidden(format!(
                    "{} may not set the display duration of a {} announcement{}",
                    actor.role,
                    current.status,
                    if current.has_image() { "" } else { " without artwork" }
                )));
            }
            if seconds == 0 {
                return Err(AppError::ValidationError("display duration must be positive".into()));
            }
        }

        let mut updated = current.clone();
        if let Some(status) = patch.status {
            updated.status = status;
            if status == AnnouncementStatus::InProgress && actor.role == Role::Designer {
                updated.assigned_to = Some(actor.id.clone());
            }
        }
        if let Some(url) = patch.image_url {
            updated.image_url = Some(url.trim().to_string());
        }
        if let Some(seconds) = patch.display_duration {
            updated.display_duration = Some(seconds);
        }
        updated.updated_at = Utc::now();

        let mut next = items.clone();
        next[index] = updated.clone();
        self.persist(&next).await?;
        *items = next;

        tracing::info!(
            id = %id,
            actor = %actor.id,
            status = %updated.status,
            "announcement updated"
        );
        Ok(updated)
    }

    /// Hard delete at any status.
    pub async fn delete(&self, actor: &Principal, id: Uuid) -> Result<()> {
        self.simulate_latency().await;

        let mut items = self.items.write().await;
        let index = position(&items, id)?;

        let mut next = items.clone();
        next.remove(index);
        self.persist(&next).await?;
        *items = next;

        tracing::info!(id = %id, actor = %actor.id, "announcement deleted");
        Ok(())
    }

    /// Drops every announcement and the persisted collection.
    pub async fn reset(&self, actor: &Principal) -> Result<()> {
        self.simulate_latency().await;

        if !policy::can_administer(actor.role) {
            return Err(AppError::Forbidden(format!("{} may not reset the system", actor.role)));
        }
        let mut items = self.items.write().await;
        self.store.remove(keys::ANNOUNCEMENTS).await.map_err(AppError::internal)?;
        let dropped = items.len();
        items.clear();

        tracing::warn!(actor = %actor.id, dropped, "announcement collection reset");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Option<Announcement> {
        self.items.read().await.iter().find(|a| a.id == id).cloned()
    }

    /// The whole collection, in insertion order.
    pub async fn list(&self) -> Vec<Announcement> {
        self.items.read().await.clone()
    }

    pub async fn list_by_status(&self, status: AnnouncementStatus) -> Vec<Announcement> {
        self.items
            .read()
            .await
            .iter()
            .filter(|a| a.status == status)
            .cloned()
            .collect()
    }

    pub async fn list_published(&self) -> Vec<Announcement> {
        self.list_by_status(AnnouncementStatus::Published).await
    }

    pub async fn stats(&self) -> DashboardStats {
        let items = self.items.read().await;
        let count = |status| items.iter().filter(|a| a.status == status).count();

        let mut recent: Vec<Announcement> = items.clone();
        // Stable sort: ties keep insertion order.
        recent.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        recent.truncate(RECENT_LIMIT);

        DashboardStats {
            pending: count(AnnouncementStatus::Pending),
            in_progress: count(AnnouncementStatus::InProgress),
            awaiting_approval: count(AnnouncementStatus::AwaitingApproval),
            published: count(AnnouncementStatus::Published),
            total: items.len(),
            recent_announcements: recent,
        }
    }

    async fn persist(&self, items: &[Announcement]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store
            .put(keys::ANNOUNCEMENTS, json)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to persist announcements");
                AppError::internal(e)
            })
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn position(items: &[Announcement], id: Uuid) -> Result<usize> {
    items
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| AppError::not_found("Announcement", id))
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
