//! The unattended display over a demo-seeded store.

use std::sync::Arc;
use std::time::Duration;

use integration_tests::Harness;
use sb_core::models::{AnnouncementPatch, AnnouncementStatus, DisplaySettings, NewAnnouncement, Role};
use sb_core::traits::IdentityProvider;
use sb_store_local::{JsonFileStore, MemoryStore};

#[tokio::test(start_paused = true)]
async fn published_request_joins_the_rotation_on_refresh() {
    let h = Harness::over(Arc::new(MemoryStore::new()), true).await;
    let admin = h.login(Role::Admin).await;
    let director = h.login(Role::Director).await;

    h.settings
        .save(&admin, DisplaySettings { refresh_rate_seconds: 20, ..DisplaySettings::default() })
        .await
        .unwrap();

    let mut scheduler = h.scheduler();
    let mut slides = scheduler.subscribe();
    scheduler.activate().await.unwrap();
    slides.changed().await.unwrap();
    assert_eq!(slides.borrow_and_update().as_ref().map(|s| s.total), Some(2));

    let a = h.repo.create(&director, NewAnnouncement::new("Blood Drive", "Donation day")).await.unwrap();
    for status in [
        AnnouncementStatus::InProgress,
        AnnouncementStatus::AwaitingApproval,
        AnnouncementStatus::Published,
    ] {
        h.repo.update(&admin, a.id, AnnouncementPatch::status(status)).await.unwrap();
    }

    tokio::time::sleep(Duration::from_secs(21)).await;
    let carousel = scheduler.carousel().await;
    assert_eq!(carousel.items().len(), 3);
    assert_eq!(carousel.items()[2].id, a.id);
    assert_eq!(carousel.items()[2].display_duration, None);

    scheduler.deactivate();
    assert!(!scheduler.is_active());
}

#[tokio::test(start_paused = true)]
async fn unpublished_store_leaves_the_display_idle() {
    let h = Harness::over(Arc::new(MemoryStore::new()), false).await;
    let mut scheduler = h.scheduler();
    scheduler.activate().await.unwrap();

    tokio::time::sleep(Duration::from_secs(120)).await;
    let carousel = scheduler.carousel().await;
    assert!(carousel.items().is_empty());
    assert_eq!(carousel.current(), None);
    assert_eq!(*scheduler.subscribe().borrow(), None);
}

#[tokio::test]
async fn file_store_keeps_work_and_session_across_restarts() {
    let dir = tempfile::tempdir().unwrap();

    let first = Harness::over(Arc::new(JsonFileStore::open(dir.path()).await.unwrap()), true).await;
    let admin = first.login(Role::Admin).await;
    let designer = first.login(Role::Designer).await;
    let pending = first.repo.list_by_status(AnnouncementStatus::Pending).await[0].id;
    first
        .repo
        .update(&designer, pending, AnnouncementPatch::status(AnnouncementStatus::InProgress))
        .await
        .unwrap();
    first.repo.delete(&admin, first.repo.list_published().await[0].id).await.unwrap();
    drop(first);

    let second = Harness::over(Arc::new(JsonFileStore::open(dir.path()).await.unwrap()), true).await;
    assert_eq!(second.repo.list().await.len(), 4);
    let claimed = second.repo.get(pending).await.unwrap();
    assert_eq!(claimed.status, AnnouncementStatus::InProgress);
    assert_eq!(claimed.assigned_to.as_deref(), Some("3"));

    // The last sign-in wins the session.
    assert_eq!(second.identity.current_principal().await.map(|p| p.role), Some(Role::Designer));
}
