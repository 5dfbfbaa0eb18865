//! # Lifecycle Policy
//!
//! Pure decision logic for who may move an announcement through the pipeline.
//! Two layers apply to every status change: a field gate (may this principal
//! touch the status at all?) and a direction table (may it go forward or back
//! from here?). Both must pass.

use crate::error::{AppError, Result};
use crate::models::{Announcement, AnnouncementStatus, Role};

/// The state one step forward, or `None` from `Published`.
pub fn next_status(status: AnnouncementStatus) -> Option<AnnouncementStatus> {
    AnnouncementStatus::ALL.get(status.rank() + 1).copied()
}

/// The state one step back, or `None` from `Pending`.
pub fn prev_status(status: AnnouncementStatus) -> Option<AnnouncementStatus> {
    status
        .rank()
        .checked_sub(1)
        .and_then(|rank| AnnouncementStatus::ALL.get(rank).copied())
}

/// Forward movement: Admin anywhere, Designer through production, Director only
/// as the approval gate out of `AwaitingApproval`.
pub fn can_advance(role: Role, status: AnnouncementStatus) -> bool {
    if next_status(status).is_none() {
        return false;
    }
    match role {
        Role::Admin => true,
        Role::Designer => matches!(
            status,
            AnnouncementStatus::Pending | AnnouncementStatus::InProgress
        ),
        Role::Director => status == AnnouncementStatus::AwaitingApproval,
    }
}

/// Backward movement is reserved for the unrestricted role.
pub fn can_retreat(role: Role, status: AnnouncementStatus) -> bool {
    role == Role::Admin && prev_status(status).is_some()
}

/// Field gate on the status itself, independent of direction.
pub fn can_change_status(role: Role, status: AnnouncementStatus) -> bool {
    match role {
        Role::Admin => true,
        Role::Designer => status != AnnouncementStatus::Published,
        Role::Director => status == AnnouncementStatus::AwaitingApproval,
    }
}

pub fn can_attach_image(role: Role) -> bool {
    matches!(role, Role::Designer | Role::Admin)
}

/// Duration only makes sense once artwork exists and the item is near or on screen.
pub fn can_set_duration(role: Role, announcement: &Announcement) -> bool {
    can_attach_image(role)
        && announcement.has_image()
        && matches!(
            announcement.status,
            AnnouncementStatus::AwaitingApproval | AnnouncementStatus::Published
        )
}

/// Who may open a new announcement request.
pub fn can_request(role: Role) -> bool {
    matches!(role, Role::Director | Role::Admin)
}

/// Display settings, system reset and account registration.
pub fn can_administer(role: Role) -> bool {
    role == Role::Admin
}

/// How a requested target status relates to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Target equals current: a re-claim, no movement.
    Stay,
    Advance,
    Retreat,
}

/// Resolves `current -> target` for `role`, enforcing both policy layers.
///
/// A principal who may not take even the first step in the requested direction
/// is refused outright; a jump of more than one step by anyone else is malformed.
pub fn authorize_status_change(
    role: Role,
    current: AnnouncementStatus,
    target: AnnouncementStatus,
) -> Result<Transition> {
    let forbidden = || {
        AppError::Forbidden(format!(
            "{role} may not move an announcement from {current} to {target}"
        ))
    };

    if !can_change_status(role, current) {
        return Err(forbidden());
    }

    let permitted = if target == current {
        true
    } else if target > current {
        can_advance(role, current)
    } else {
        can_retreat(role, current)
    };
    if !permitted {
        return Err(forbidden());
    }

    if target == current {
        Ok(Transition::Stay)
    } else if next_status(current) == Some(target) {
        Ok(Transition::Advance)
    } else if prev_status(current) == Some(target) {
        Ok(Transition::Retreat)
    } else {
        Err(AppError::ValidationError(format!(
            "cannot move from {current} to {target}: status changes one step at a time"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AnnouncementStatus::*;

    const ROLES: [Role; 3] = [Role::Admin, Role::Director, Role::Designer];

    #[test]
    fn next_and_prev_walk_the_hierarchy() {
        assert_eq!(next_status(Pending), Some(InProgress));
        assert_eq!(next_status(AwaitingApproval), Some(Published));
        assert_eq!(next_status(Published), None);
        assert_eq!(prev_status(Pending), None);
        assert_eq!(prev_status(Published), Some(AwaitingApproval));
    }

    #[test]
    fn advance_is_always_exactly_one_step() {
        for role in ROLES {
            for status in AnnouncementStatus::ALL {
                if can_advance(role, status) {
                    let next = next_status(status).expect("advance implies a next state");
                    assert_eq!(next.rank(), status.rank() + 1);
                }
            }
            assert!(!can_advance(role, Published));
        }
    }

    #[test]
    fn direction_table_matches_roles() {
        assert!(can_advance(Role::Designer, Pending));
        assert!(can_advance(Role::Designer, InProgress));
        assert!(!can_advance(Role::Designer, AwaitingApproval));

        assert!(!can_advance(Role::Director, InProgress));
        assert!(can_advance(Role::Director, AwaitingApproval));

        assert!(can_advance(Role::Admin, Pending));
        assert!(can_retreat(Role::Admin, Published));
        assert!(!can_retreat(Role::Admin, Pending));
        assert!(!can_retreat(Role::Designer, InProgress));
        assert!(!can_retreat(Role::Director, Published));
    }

    #[test]
    fn duration_requires_image_and_late_status() {
        let mut a = Announcement {
            id: uuid::Uuid::now_v7(),
            title: "t".into(),
            description: "d".into(),
            status: InProgress,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            requested_by: "2".into(),
            assigned_to: None,
            image_url: Some("https://example.com/a.png".into()),
            display_duration: None,
            briefing_pdf_url: None,
            briefing_pdf_name: None,
        };
        assert!(!can_set_duration(Role::Designer, &a));
        a.status = AwaitingApproval;
        assert!(can_set_duration(Role::Designer, &a));
        assert!(!can_set_duration(Role::Director, &a));
        a.image_url = None;
        assert!(!can_set_duration(Role::Admin, &a));
    }

    #[test]
    fn director_cannot_publish_from_in_progress() {
        let err = authorize_status_change(Role::Director, InProgress, AwaitingApproval).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(
            authorize_status_change(Role::Director, AwaitingApproval, Published),
            Ok(Transition::Advance)
        );
    }

    #[test]
    fn jump_by_unpermitted_role_is_forbidden() {
        let err = authorize_status_change(Role::Director, InProgress, Published).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = authorize_status_change(Role::Designer, AwaitingApproval, Pending).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = authorize_status_change(Role::Designer, Published, Pending).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn jump_by_permitted_role_is_malformed() {
        let err = authorize_status_change(Role::Admin, Pending, Published).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = authorize_status_change(Role::Admin, Published, InProgress).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        let err = authorize_status_change(Role::Designer, Pending, AwaitingApproval).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn designer_can_reclaim_in_progress_but_not_touch_published() {
        assert_eq!(
            authorize_status_change(Role::Designer, InProgress, InProgress),
            Ok(Transition::Stay)
        );
        assert!(authorize_status_change(Role::Designer, Published, Published).is_err());
        assert!(authorize_status_change(Role::Designer, InProgress, Pending).is_err());
        assert_eq!(
            authorize_status_change(Role::Admin, Published, AwaitingApproval),
            Ok(Transition::Retreat)
        );
    }
}
