//! The request → production → approval pipeline, driven by signed-in principals.

use std::sync::Arc;

use integration_tests::Harness;
use sb_core::error::AppError;
use sb_core::models::{AnnouncementPatch, AnnouncementStatus, NewAnnouncement, Role};
use sb_core::traits::keys;
use sb_store_local::MemoryStore;
use tokio_test::{assert_err, assert_ok};

async fn harness() -> Harness {
    Harness::over(Arc::new(MemoryStore::new()), false).await
}

#[tokio::test]
async fn director_request_is_claimed_by_designer() {
    let h = harness().await;
    let director = h.login(Role::Director).await;
    let designer = h.login(Role::Designer).await;

    let created = assert_ok!(h.repo.create(&director, NewAnnouncement::new("Fair", "Career fair poster")).await);
    assert_eq!(created.status, AnnouncementStatus::Pending);
    assert_eq!(created.requested_by, director.id);
    assert_eq!(created.assigned_to, None);

    let claimed = assert_ok!(
        h.repo
            .update(&designer, created.id, AnnouncementPatch::status(AnnouncementStatus::InProgress))
            .await
    );
    assert_eq!(claimed.status, AnnouncementStatus::InProgress);
    assert_eq!(claimed.assigned_to.as_deref(), Some(designer.id.as_str()));

    let err = assert_err!(
        h.repo
            .update(&director, created.id, AnnouncementPatch::status(AnnouncementStatus::Published))
            .await
    );
    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(h.repo.get(created.id).await.unwrap().status, AnnouncementStatus::InProgress);
}

#[tokio::test]
async fn empty_title_adds_nothing() {
    let h = harness().await;
    let director = h.login(Role::Director).await;

    let err = assert_err!(h.repo.create(&director, NewAnnouncement::new("", "Career fair poster")).await);
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(h.repo.list_by_status(AnnouncementStatus::Pending).await.is_empty());
    assert_eq!(h.store.get(keys::ANNOUNCEMENTS).await.unwrap(), None);
}

#[tokio::test]
async fn full_pipeline_reaches_the_display_set() {
    let h = harness().await;
    let director = h.login(Role::Director).await;
    let designer = h.login(Role::Designer).await;

    let mut request = NewAnnouncement::new("Open Day", "Campus open day banner");
    request.briefing_pdf_name = Some("open-day-brief.pdf".into());
    let a = h.repo.create(&director, request).await.unwrap();
    assert_eq!(a.briefing_pdf_url.as_deref(), Some("mock-url/open-day-brief.pdf"));

    h.repo.update(&designer, a.id, AnnouncementPatch::status(AnnouncementStatus::InProgress)).await.unwrap();
    h.repo.update(&designer, a.id, AnnouncementPatch::image_url("https://cdn.example.com/open-day.png")).await.unwrap();

    // Duration is only editable once the artwork is up for approval.
    let err = h.repo.update(&designer, a.id, AnnouncementPatch::display_duration(9)).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    h.repo.update(&designer, a.id, AnnouncementPatch::status(AnnouncementStatus::AwaitingApproval)).await.unwrap();
    h.repo.update(&designer, a.id, AnnouncementPatch::display_duration(9)).await.unwrap();

    // Designers hand over at approval; the director signs off.
    let err = h.repo
        .update(&designer, a.id, AnnouncementPatch::status(AnnouncementStatus::Published))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let published = h.repo
        .update(&director, a.id, AnnouncementPatch::status(AnnouncementStatus::Published))
        .await
        .unwrap();

    assert_eq!(published.display_duration, Some(9));
    assert_eq!(h.repo.list_published().await, vec![published]);

    let stats = h.repo.stats().await;
    assert_eq!(stats.total, 1);
    assert_eq!(stats.count(AnnouncementStatus::Published), 1);
}

#[tokio::test]
async fn admin_can_step_back_and_reset() {
    let h = harness().await;
    let admin = h.login(Role::Admin).await;
    let director = h.login(Role::Director).await;

    let a = h.repo.create(&admin, NewAnnouncement::new("Notice", "Lift maintenance")).await.unwrap();
    h.repo.update(&admin, a.id, AnnouncementPatch::status(AnnouncementStatus::InProgress)).await.unwrap();
    let back = h.repo.update(&admin, a.id, AnnouncementPatch::status(AnnouncementStatus::Pending)).await.unwrap();
    assert_eq!(back.status, AnnouncementStatus::Pending);

    let err = h.repo.reset(&director).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    h.repo.reset(&admin).await.unwrap();
    assert!(h.repo.list().await.is_empty());
    assert_eq!(h.store.get(keys::ANNOUNCEMENTS).await.unwrap(), None);
}
