//! # Display Scheduler
//!
//! Drives the unattended display: rotates through the published announcements
//! on a per-item timer and reloads the published set every
//! `refresh_rate_seconds`.
//!
//! All timers live in one background task. Each loop turn sleeps until the
//! carousel's current deadline, so re-arming simply means the next turn sleeps
//! on a new deadline. Callers that change the carousel wake the task through a
//! `Notify`. `deactivate()` (or dropping the scheduler) aborts the task, taking
//! both the refresh and the per-item timer with it.

mod carousel;

pub use carousel::Carousel;

use std::sync::Arc;
use std::time::Duration;

use sb_core::error::Result;
use sb_core::models::{Announcement, Principal};
use tokio::sync::{watch, Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::repository::AnnouncementRepository;
use crate::settings::SettingsService;

/// What the display should be showing right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub announcement: Announcement,
    pub index: usize,
    pub total: usize,
    pub duration: Duration,
}

struct Shared {
    carousel: Mutex<Carousel>,
    rearm: Notify,
    slides: watch::Sender<Option<Slide>>,
}

impl Shared {
    fn publish(&self, carousel: &Carousel) {
        let slide = carousel.current().map(|announcement| Slide {
            announcement: announcement.clone(),
            index: carousel.current_index(),
            total: carousel.items().len(),
            duration: carousel.current_duration().unwrap_or_default(),
        });
        self.slides.send_if_modified(|shown| {
            if *shown == slide {
                return false;
            }
            *shown = slide;
            true
        });
    }

    async fn reload(&self, repo: &AnnouncementRepository) -> bool {
        let published = repo.list_published().await;
        let mut carousel = self.carousel.lock().await;
        let changed = carousel.refresh(published, Instant::now());
        if changed {
            tracing::info!(count = carousel.items().len(), "display set refreshed");
        }
        self.publish(&carousel);
        changed
    }
}

pub struct DisplayScheduler {
    repo: Arc<AnnouncementRepository>,
    settings: Arc<SettingsService>,
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
}

impl DisplayScheduler {
    pub fn new(repo: Arc<AnnouncementRepository>, settings: Arc<SettingsService>) -> Self {
        let (slides, _) = watch::channel(None);
        let defaults = sb_core::models::DisplaySettings::default();
        Self {
            repo,
            settings,
            shared: Arc::new(Shared {
                carousel: Mutex::new(Carousel::new(seconds(defaults.default_duration))),
                rearm: Notify::new(),
                slides,
            }),
            task: None,
        }
    }

    /// Loads the display settings and starts rotating. Calling it on an active
    /// scheduler does nothing.
    pub async fn activate(&mut self) -> Result<()> {
        if self.task.is_some() {
            return Ok(());
        }
        let settings = self.settings.load().await?;
        *self.shared.carousel.lock().await = Carousel::new(seconds(settings.default_duration));

        let refresh_every = seconds(settings.refresh_rate_seconds);
        self.task = Some(tokio::spawn(run(self.repo.clone(), self.shared.clone(), refresh_every)));

        tracing::info!(
            default_duration = settings.default_duration,
            refresh_rate_seconds = settings.refresh_rate_seconds,
            "display scheduler activated"
        );
        Ok(())
    }

    /// Cancels both timers. The last carousel state stays readable.
    pub fn deactivate(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::info!("display scheduler deactivated");
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Follows slide changes. Holds `None` while nothing is published.
    pub fn subscribe(&self) -> watch::Receiver<Option<Slide>> {
        self.shared.slides.subscribe()
    }

    /// A copy of the current rotation state.
    pub async fn carousel(&self) -> Carousel {
        self.shared.carousel.lock().await.clone()
    }

    /// Reloads the published set now instead of waiting for the next refresh.
    pub async fn refresh(&self) -> bool {
        let changed = self.shared.reload(&self.repo).await;
        if changed {
            self.shared.rearm.notify_one();
        }
        changed
    }

    /// Jumps to `index` and restarts its timer.
    pub async fn select(&self, index: usize) -> Result<()> {
        let mut carousel = self.shared.carousel.lock().await;
        carousel.select(index, Instant::now())?;
        self.shared.publish(&carousel);
        drop(carousel);

        self.shared.rearm.notify_one();
        Ok(())
    }

    /// Deletes an announcement through the repository, then drops it from the
    /// display. A failed delete leaves the rotation untouched.
    pub async fn delete(&self, actor: &Principal, id: Uuid) -> Result<()> {
        self.repo.delete(actor, id).await?;

        let mut carousel = self.shared.carousel.lock().await;
        if carousel.remove(id, Instant::now()) {
            self.shared.publish(&carousel);
            drop(carousel);
            self.shared.rearm.notify_one();
        }
        Ok(())
    }
}

impl Drop for DisplayScheduler {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn run(repo: Arc<AnnouncementRepository>, shared: Arc<Shared>, refresh_every: Duration) {
    let mut refresh = tokio::time::interval(refresh_every);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let deadline = shared.carousel.lock().await.deadline();

        tokio::select! {
            _ = refresh.tick() => {
                shared.reload(&repo).await;
            }
            _ = shared.rearm.notified() => {}
            _ = expiry(deadline) => {
                let mut carousel = shared.carousel.lock().await;
                // Re-armed by a caller while we were waking up.
                if carousel.deadline() != deadline {
                    continue;
                }
                carousel.advance(Instant::now());
                tracing::debug!(index = carousel.current_index(), "slide advanced");
                shared.publish(&carousel);
            }
        }
    }
}

async fn expiry(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn seconds(secs: u32) -> Duration {
    Duration::from_secs(u64::from(secs))
}
