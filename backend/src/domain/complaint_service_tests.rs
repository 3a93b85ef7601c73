//! Tests for the complaint service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockComplaintRepository, MockMessRepository, MockNotificationSink, MockUserRepository,
    NotificationError,
};
use crate::domain::service_test_helpers::{actor, clock_at, mess, user, utc};
use crate::domain::{ComplaintStatus, ErrorCode, UserId};

type Service = ComplaintService<
    MockComplaintRepository,
    MockMessRepository,
    MockUserRepository,
    MockNotificationSink,
>;

struct Mocks {
    complaints: MockComplaintRepository,
    messes: MockMessRepository,
    users: MockUserRepository,
    notifier: MockNotificationSink,
}

impl Mocks {
    fn new() -> Self {
        Self {
            complaints: MockComplaintRepository::new(),
            messes: MockMessRepository::new(),
            users: MockUserRepository::new(),
            notifier: MockNotificationSink::new(),
        }
    }

    fn build(self) -> Service {
        ComplaintService::new(
            Arc::new(self.complaints),
            Arc::new(self.messes),
            Arc::new(self.users),
            Arc::new(self.notifier),
            clock_at(utc(2025, 1, 10, 9, 0)),
        )
    }
}

fn pending_complaint(student_id: &UserId) -> Complaint {
    Complaint::file(
        NewComplaint {
            id: ComplaintId::random(),
            mess_id: MessId::random(),
            student_id: student_id.clone(),
            student_name: user(student_id, "Ravi Kumar", Role::Student)
                .display_name()
                .clone(),
            subject: "Cold food".to_owned(),
            description: "Dinner was served cold twice this week".to_owned(),
        },
        utc(2025, 1, 9, 18, 0),
    )
    .expect("valid complaint")
}

fn filing_mocks(student: &Actor) -> (Mocks, MessId) {
    let stored_mess = mess(&UserId::random());
    let mess_id = stored_mess.id();
    let stored_user = user(&student.user_id, "Ravi Kumar", Role::Student);
    let mut mocks = Mocks::new();
    mocks
        .messes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_mess)));
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_user)));
    (mocks, mess_id)
}

#[tokio::test]
async fn file_complaint_stores_pending_complaint_and_notifies() {
    let student = actor(Role::Student);
    let (mut mocks, mess_id) = filing_mocks(&student);
    mocks
        .complaints
        .expect_insert()
        .withf(move |complaint: &Complaint| {
            complaint.mess_id() == mess_id
                && complaint.status() == ComplaintStatus::Pending
                && complaint.subject() == "Cold food"
        })
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .notifier
        .expect_notify()
        .withf(move |n: &Notification| {
            matches!(n, Notification::ComplaintFiled { mess_id: id, .. } if *id == mess_id)
        })
        .times(1)
        .return_once(|_| Ok(()));

    let complaint = mocks
        .build()
        .file_complaint(
            &student,
            FileComplaintRequest {
                mess_id,
                subject: "  Cold food ".to_owned(),
                description: "Dinner was served cold".to_owned(),
            },
        )
        .await
        .expect("complaint filed");

    assert_eq!(complaint.student_id(), &student.user_id);
    assert_eq!(complaint.student_name().as_ref(), "Ravi Kumar");
    assert_eq!(complaint.revision(), 1);
}

#[tokio::test]
async fn file_complaint_survives_notification_failure() {
    let student = actor(Role::Student);
    let (mut mocks, mess_id) = filing_mocks(&student);
    mocks.complaints.expect_insert().return_once(|_| Ok(()));
    mocks
        .notifier
        .expect_notify()
        .times(1)
        .return_once(|_| Err(NotificationError::delivery("mailer offline")));

    let result = mocks
        .build()
        .file_complaint(
            &student,
            FileComplaintRequest {
                mess_id,
                subject: "Hair in food".to_owned(),
                description: "Found in lunch".to_owned(),
            },
        )
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn file_complaint_rejects_unknown_mess() {
    let mut mocks = Mocks::new();
    mocks.messes.expect_find_by_id().return_once(|_| Ok(None));
    mocks.complaints.expect_insert().times(0);

    let err = mocks
        .build()
        .file_complaint(
            &actor(Role::Student),
            FileComplaintRequest {
                mess_id: MessId::random(),
                subject: "Cold food".to_owned(),
                description: "Cold".to_owned(),
            },
        )
        .await
        .expect_err("unknown mess");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case("   ", "Dinner was cold")]
#[case("Cold food", "")]
#[tokio::test]
async fn file_complaint_requires_subject_and_description(
    #[case] subject: &str,
    #[case] description: &str,
) {
    let student = actor(Role::Student);
    let (mut mocks, mess_id) = filing_mocks(&student);
    mocks.complaints.expect_insert().times(0);

    let err = mocks
        .build()
        .file_complaint(
            &student,
            FileComplaintRequest {
                mess_id,
                subject: subject.to_owned(),
                description: description.to_owned(),
            },
        )
        .await
        .expect_err("missing text");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(Role::Owner)]
#[case(Role::Admin)]
#[tokio::test]
async fn only_students_file_complaints(#[case] role: Role) {
    let err = Mocks::new()
        .build()
        .file_complaint(
            &actor(role),
            FileComplaintRequest {
                mess_id: MessId::random(),
                subject: "Cold food".to_owned(),
                description: "Cold".to_owned(),
            },
        )
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn resolve_closes_pending_complaint() {
    let stored = pending_complaint(&UserId::random());
    let id = stored.id();
    let mut mocks = Mocks::new();
    mocks
        .complaints
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .complaints
        .expect_save()
        .withf(|complaint: &Complaint, expected: &u32| {
            complaint.status() == ComplaintStatus::Resolved
                && complaint.revision() == 2
                && *expected == 1
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let resolved = mocks
        .build()
        .resolve(&actor(Role::Admin), id)
        .await
        .expect("resolved");
    assert_eq!(resolved.resolved_at(), Some(utc(2025, 1, 10, 9, 0)));
}

#[tokio::test]
async fn dismiss_closes_pending_complaint() {
    let stored = pending_complaint(&UserId::random());
    let id = stored.id();
    let mut mocks = Mocks::new();
    mocks
        .complaints
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks.complaints.expect_save().return_once(|_, _| Ok(()));

    let dismissed = mocks
        .build()
        .dismiss(&actor(Role::Admin), id)
        .await
        .expect("dismissed");
    assert_eq!(dismissed.status(), ComplaintStatus::Dismissed);
}

#[tokio::test]
async fn resolving_a_closed_complaint_is_invalid_state() {
    let mut stored = pending_complaint(&UserId::random());
    stored
        .resolve(utc(2025, 1, 9, 20, 0))
        .expect("first resolve");
    let id = stored.id();
    let mut mocks = Mocks::new();
    mocks
        .complaints
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks.complaints.expect_save().times(0);

    let err = mocks
        .build()
        .resolve(&actor(Role::Admin), id)
        .await
        .expect_err("already resolved");
    assert_eq!(err.code(), ErrorCode::InvalidState);
}

#[tokio::test]
async fn lost_revision_race_maps_to_conflict() {
    let stored = pending_complaint(&UserId::random());
    let id = stored.id();
    let mut mocks = Mocks::new();
    mocks
        .complaints
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .complaints
        .expect_save()
        .return_once(|_, _| Err(ComplaintRepositoryError::revision_mismatch(1_u32, 2_u32)));

    let err = mocks
        .build()
        .dismiss(&actor(Role::Admin), id)
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
    let details = err.details().expect("details present");
    assert_eq!(details["code"], "revision_mismatch");
}

#[tokio::test]
async fn resolve_reports_missing_complaint() {
    let mut mocks = Mocks::new();
    mocks
        .complaints
        .expect_find_by_id()
        .return_once(|_| Ok(None));

    let err = mocks
        .build()
        .resolve(&actor(Role::Admin), ComplaintId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Role::Student)]
#[case(Role::Owner)]
#[tokio::test]
async fn only_admins_resolve(#[case] role: Role) {
    let mut mocks = Mocks::new();
    mocks.complaints.expect_find_by_id().times(0);

    let err = mocks
        .build()
        .resolve(&actor(role), ComplaintId::random())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case("")]
#[case("   ")]
#[tokio::test]
async fn send_warning_rejects_blank_messages(#[case] message: &str) {
    let mut mocks = Mocks::new();
    mocks.users.expect_find_by_id().times(0);

    let err = mocks
        .build()
        .send_warning(
            &actor(Role::Admin),
            SendWarningRequest {
                owner_id: UserId::random(),
                message: message.to_owned(),
            },
        )
        .await
        .expect_err("blank warning");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn send_warning_rejects_oversized_messages() {
    let err = Mocks::new()
        .build()
        .send_warning(
            &actor(Role::Admin),
            SendWarningRequest {
                owner_id: UserId::random(),
                message: "w".repeat(WARNING_MAX + 1),
            },
        )
        .await
        .expect_err("too long");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn send_warning_requires_an_owner_target() {
    let student_id = UserId::random();
    let stored = user(&student_id, "Ravi Kumar", Role::Student);
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks.notifier.expect_notify().times(0);

    let err = mocks
        .build()
        .send_warning(
            &actor(Role::Admin),
            SendWarningRequest {
                owner_id: student_id,
                message: "Improve hygiene".to_owned(),
            },
        )
        .await
        .expect_err("not an owner");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn send_warning_notifies_owner() {
    let owner_id = UserId::random();
    let stored = user(&owner_id, "Meena Patil", Role::Owner);
    let admin = actor(Role::Admin);
    let expected_owner = owner_id.clone();
    let expected_admin = admin.user_id.clone();
    let mut mocks = Mocks::new();
    mocks
        .users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .notifier
        .expect_notify()
        .withf(move |n: &Notification| {
            matches!(
                n,
                Notification::OwnerWarning { owner_id, issued_by, message }
                    if *owner_id == expected_owner
                        && *issued_by == expected_admin
                        && message == "Improve hygiene"
            )
        })
        .times(1)
        .return_once(|_| Ok(()));

    mocks
        .build()
        .send_warning(
            &admin,
            SendWarningRequest {
                owner_id,
                message: " Improve hygiene ".to_owned(),
            },
        )
        .await
        .expect("warning sent");
}

#[tokio::test]
async fn owners_cannot_list_complaints_for_foreign_messes() {
    let stored = mess(&UserId::random());
    let mess_id = stored.id();
    let mut mocks = Mocks::new();
    mocks
        .messes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks.complaints.expect_list_by_mess().times(0);

    let err = mocks
        .build()
        .list_mess_complaints(&actor(Role::Owner), mess_id)
        .await
        .expect_err("foreign mess");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn owner_of_mess_and_admins_list_mess_complaints(#[case] as_owner: bool) {
    let caller = if as_owner {
        actor(Role::Owner)
    } else {
        actor(Role::Admin)
    };
    let stored = mess(&caller.user_id);
    let mess_id = stored.id();
    let mut mocks = Mocks::new();
    mocks
        .messes
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored)));
    mocks
        .complaints
        .expect_list_by_mess()
        .withf(move |id: &MessId| *id == mess_id)
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let listed = mocks
        .build()
        .list_mess_complaints(&caller, mess_id)
        .await
        .expect("listing allowed");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn list_all_complaints_is_admin_only() {
    let err = Mocks::new()
        .build()
        .list_all_complaints(&actor(Role::Student))
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
