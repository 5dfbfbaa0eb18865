//! # Domain Models
//!
//! These structs represent the core entities of Signboard.
//! Announcements use UUID v7 for time-ordered, globally unique identification.
//! Field names serialize in camelCase so stored collections stay readable by
//! any other client of the same key-value store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Position of an announcement in the production pipeline.
///
/// The declaration order is the lifecycle order, so the derived `Ord` is the
/// hierarchy `Pending < InProgress < AwaitingApproval < Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementStatus {
    Pending,
    InProgress,
    AwaitingApproval,
    Published,
}

impl AnnouncementStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [AnnouncementStatus; 4] = [
        AnnouncementStatus::Pending,
        AnnouncementStatus::InProgress,
        AnnouncementStatus::AwaitingApproval,
        AnnouncementStatus::Published,
    ];

    /// Zero-based rank in the hierarchy.
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnnouncementStatus::Pending => "pending",
            AnnouncementStatus::InProgress => "in_progress",
            AnnouncementStatus::AwaitingApproval => "awaiting_approval",
            AnnouncementStatus::Published => "published",
        }
    }
}

impl fmt::Display for AnnouncementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncementStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnnouncementStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("unknown status: {s}")))
    }
}

/// Role carried by an authenticated principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unrestricted: may move a status in either direction and administer the system.
    Admin,
    /// Requests announcements and approves them for publication.
    Director,
    /// Produces artwork and pushes work through production.
    Designer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Director => "director",
            Role::Designer => "designer",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "director" => Ok(Role::Director),
            "designer" => Ok(Role::Designer),
            _ => Err(AppError::ValidationError(format!("unknown role: {s}"))),
        }
    }
}

/// An authenticated actor. Issued by an `IdentityProvider`, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// The unit of signage content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: AnnouncementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Principal id of the requester
    pub requested_by: String,
    /// Designer who took the job; set by the repository, never by input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Seconds on screen; falls back to the display default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub briefing_pdf_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub briefing_pdf_name: Option<String>,
}

impl Announcement {
    pub fn has_image(&self) -> bool {
        self.image_url.is_some()
    }
}

/// Input for a new announcement request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub description: String,
    /// File name of an optional briefing document; only the name is kept.
    #[serde(default)]
    pub briefing_pdf_name: Option<String>,
}

impl NewAnnouncement {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            briefing_pdf_name: None,
        }
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementPatch {
    #[serde(default)]
    pub status: Option<AnnouncementStatus>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub display_duration: Option<u32>,
}

impl AnnouncementPatch {
    pub fn status(status: AnnouncementStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self { image_url: Some(url.into()), ..Default::default() }
    }

    pub fn display_duration(seconds: u32) -> Self {
        Self { display_duration: Some(seconds), ..Default::default() }
    }
}

/// Derived dashboard view. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub pending: usize,
    pub in_progress: usize,
    pub awaiting_approval: usize,
    pub published: usize,
    pub total: usize,
    /// Five most recently updated, newest first
    pub recent_announcements: Vec<Announcement>,
}

impl DashboardStats {
    pub fn count(&self, status: AnnouncementStatus) -> usize {
        match status {
            AnnouncementStatus::Pending => self.pending,
            AnnouncementStatus::InProgress => self.in_progress,
            AnnouncementStatus::AwaitingApproval => self.awaiting_approval,
            AnnouncementStatus::Published => self.published,
        }
    }
}

/// Display configuration, persisted independently of announcements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Transition speed between slides, in seconds
    pub carousel_speed: u32,
    /// Seconds on screen for announcements without their own duration
    pub default_duration: u32,
    /// Seconds between reloads of the published set
    #[serde(alias = "refreshRate")]
    pub refresh_rate_seconds: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            carousel_speed: 5,
            default_duration: 10,
            refresh_rate_seconds: 60,
        }
    }
}

impl DisplaySettings {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.carousel_speed == 0 {
            return Err(AppError::ValidationError("carousel speed must be at least 1 second".into()));
        }
        if self.default_duration == 0 {
            return Err(AppError::ValidationError("default duration must be at least 1 second".into()));
        }
        if self.refresh_rate_seconds == 0 {
            return Err(AppError::ValidationError("refresh rate must be at least 1 second".into()));
        }
        Ok(())
    }
}
