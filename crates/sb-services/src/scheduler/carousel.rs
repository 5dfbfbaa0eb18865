//! Rotation state of the display, free of any runtime.
//!
//! Every change to `items` or `current_index` re-arms the per-item timer by
//! stamping `armed_at`; the deadline is derived from that stamp and the current
//! item's duration. The driver in the parent module sleeps until the deadline.

use std::time::Duration;

use sb_core::error::{AppError, Result};
use sb_core::models::Announcement;
use tokio::time::Instant;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Carousel {
    items: Vec<Announcement>,
    current_index: usize,
    default_duration: Duration,
    armed_at: Option<Instant>,
}

impl Carousel {
    pub fn new(default_duration: Duration) -> Self {
        Self {
            items: Vec::new(),
            current_index: 0,
            default_duration,
            armed_at: None,
        }
    }

    pub fn items(&self) -> &[Announcement] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> Option<&Announcement> {
        self.items.get(self.current_index)
    }

    /// Time on screen for the current item.
    pub fn current_duration(&self) -> Option<Duration> {
        self.current().map(|a| {
            a.display_duration
                .map(|secs| Duration::from_secs(u64::from(secs)))
                .unwrap_or(self.default_duration)
        })
    }

    /// When the armed timer expires. `None` while idle.
    pub fn deadline(&self) -> Option<Instant> {
        Some(self.armed_at? + self.current_duration()?)
    }

    /// Replaces the working set. Returns whether the timer was re-armed; a set
    /// with the same slides and timings keeps the index and the armed timer,
    /// though its content is still taken over.
    pub fn refresh(&mut self, items: Vec<Announcement>, now: Instant) -> bool {
        if same_slides(&self.items, &items) {
            self.items = items;
            return false;
        }
        self.items = items;
        if self.current_index >= self.items.len() {
            self.current_index = 0;
        }
        self.rearm(now);
        true
    }

    /// Timer expiry: step forward, wrapping after the last item.
    pub fn advance(&mut self, now: Instant) {
        if self.items.is_empty() {
            return;
        }
        self.current_index = (self.current_index + 1) % self.items.len();
        self.rearm(now);
    }

    /// Manual navigation.
    pub fn select(&mut self, index: usize, now: Instant) -> Result<()> {
        if index >= self.items.len() {
            return Err(AppError::ValidationError(format!(
                "slide {index} out of range ({} on display)",
                self.items.len()
            )));
        }
        self.current_index = index;
        self.rearm(now);
        Ok(())
    }

    /// Drops `id` from the working set. Returns `false` if it was not on display.
    pub fn remove(&mut self, id: Uuid, now: Instant) -> bool {
        let Some(index) = self.items.iter().position(|a| a.id == id) else {
            return false;
        };
        self.items.remove(index);
        if index <= self.current_index && self.current_index >= self.items.len() {
            self.current_index = self.items.len().saturating_sub(1);
        }
        self.rearm(now);
        true
    }

    fn rearm(&mut self, now: Instant) {
        self.armed_at = (!self.items.is_empty()).then_some(now);
    }
}

/// Two working sets show the same slides when ids and durations line up.
fn same_slides(a: &[Announcement], b: &[Announcement]) -> bool {
    a.len() == b.len()
        && a.iter()
            .zip(b)
            .all(|(x, y)| x.id == y.id && x.display_duration == y.display_duration && x.image_url == y.image_url)
}
