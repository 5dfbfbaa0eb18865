//! Demo content for a fresh installation: one announcement at every stage of
//! the pipeline, two of them published so the display has something to show.

use chrono::{DateTime, Duration, Utc};
use sb_core::models::{Announcement, AnnouncementStatus};
use uuid::Uuid;

/// Principal ids of the demo accounts the seeded items refer to.
pub const DEMO_DIRECTOR_ID: &str = "2";
pub const DEMO_DESIGNER_ID: &str = "3";

struct Demo {
    title: &'static str,
    description: &'static str,
    status: AnnouncementStatus,
    created_days_ago: i64,
    updated_days_ago: i64,
    image: Option<&'static str>,
    duration: Option<u32>,
}

const DEMOS: [Demo; 5] = [
    Demo {
        title: "Welcome Week Events",
        description: "Create a poster with all the welcome week events for new students",
        status: AnnouncementStatus::Published,
        created_days_ago: 7,
        updated_days_ago: 5,
        image: Some("https://source.unsplash.com/random/1200x800/?university,event"),
        duration: Some(8),
    },
    Demo {
        title: "Library Hours Change",
        description: "Create an announcement for new library hours during exam period",
        status: AnnouncementStatus::AwaitingApproval,
        created_days_ago: 3,
        updated_days_ago: 1,
        image: Some("https://source.unsplash.com/random/1200x800/?library,study"),
        duration: Some(6),
    },
    Demo {
        title: "Career Fair",
        description: "Design a poster for the upcoming career fair with all participating companies",
        status: AnnouncementStatus::InProgress,
        created_days_ago: 2,
        updated_days_ago: 1,
        image: None,
        duration: None,
    },
    Demo {
        title: "Sports Tournament",
        description: "Create graphics for the inter-college sports tournament",
        status: AnnouncementStatus::Pending,
        created_days_ago: 0,
        updated_days_ago: 0,
        image: None,
        duration: None,
    },
    Demo {
        title: "Graduation Ceremony",
        description: "Design poster for graduation ceremony with date, time and venue details",
        status: AnnouncementStatus::Published,
        created_days_ago: 10,
        updated_days_ago: 8,
        image: Some("https://source.unsplash.com/random/1200x800/?graduation,ceremony"),
        duration: Some(7),
    },
];

/// Builds the demo collection with timestamps relative to `now`.
pub fn demo_announcements(now: DateTime<Utc>) -> Vec<Announcement> {
    DEMOS
        .iter()
        .map(|demo| Announcement {
            id: Uuid::now_v7(),
            title: demo.title.to_string(),
            description: demo.description.to_string(),
            status: demo.status,
            created_at: now - Duration::days(demo.created_days_ago),
            updated_at: now - Duration::days(demo.updated_days_ago),
            requested_by: DEMO_DIRECTOR_ID.to_string(),
            // Anything past Pending has been picked up by the demo designer.
            assigned_to: (demo.status > AnnouncementStatus::Pending).then(|| DEMO_DESIGNER_ID.to_string()),
            image_url: demo.image.map(str::to_string),
            display_duration: demo.duration,
            briefing_pdf_url: None,
            briefing_pdf_name: None,
        })
        .collect()
}
