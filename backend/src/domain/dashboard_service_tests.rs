//! Tests for the dashboard service.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};
use rust_decimal_macros::dec;

use super::*;
use crate::domain::ports::{
    MockComplaintRepository, MockMessRepository, MockSubscriptionRepository, MockUserRepository,
};
use crate::domain::service_test_helpers::{
    actor, clock_at, date, mess, schedule, user, utc, verified_mess,
};
use crate::domain::{
    ComplaintId, ErrorCode, MessId, NewComplaint, NewSubscription, PaymentReference, Plan, Price,
    RatingValue, Role, Subscription, SubscriptionId, UserId,
};

type Service = DashboardService<
    MockUserRepository,
    MockMessRepository,
    MockSubscriptionRepository,
    MockComplaintRepository,
>;

#[derive(Default)]
struct Mocks {
    users: MockUserRepository,
    messes: MockMessRepository,
    subscriptions: MockSubscriptionRepository,
    complaints: MockComplaintRepository,
}

impl Mocks {
    fn build(self) -> Service {
        // 2025-01-20 11:30 at UTC+05:30.
        DashboardService::new(
            Arc::new(self.users),
            Arc::new(self.messes),
            Arc::new(self.subscriptions),
            Arc::new(self.complaints),
            clock_at(utc(2025, 1, 20, 6, 0)),
            schedule(),
        )
    }
}

fn subscription(mess_id: MessId, plan: Plan, start: NaiveDate, amount: i64) -> Subscription {
    Subscription::start(
        NewSubscription {
            id: SubscriptionId::random(),
            student_id: UserId::random(),
            mess_id,
            plan,
            start_date: start,
            price: Price::new(amount.into()).expect("positive price"),
            payment: PaymentReference {
                order_id: format!("order_{}", SubscriptionId::random()),
                payment_id: "pay_1".to_owned(),
            },
        },
        start,
        utc(2024, 12, 31, 20, 0),
    )
    .expect("valid subscription")
}

fn rated(mut mess: Mess, values: &[i64]) -> Mess {
    for value in values {
        mess.rating_mut()
            .record(RatingValue::new(*value).expect("valid rating"));
    }
    mess
}

struct OwnerFixture {
    owner: Actor,
    messes: Vec<Mess>,
    subscriptions: Vec<Subscription>,
}

#[fixture]
fn owner_fixture() -> OwnerFixture {
    let owner = actor(Role::Owner);
    let first = rated(verified_mess(&owner.user_id), &[5, 3]);
    let second = rated(verified_mess(&owner.user_id), &[5]);

    let mut cancelled = subscription(second.id(), Plan::Monthly, date(2025, 1, 5), 2800);
    cancelled
        .cancel(utc(2025, 1, 6, 0, 0))
        .expect("cancel active");
    let subscriptions = vec![
        subscription(first.id(), Plan::Monthly, date(2025, 1, 1), 3000),
        subscription(first.id(), Plan::Weekly, date(2025, 1, 1), 800),
        subscription(second.id(), Plan::Weekly, date(2025, 1, 18), 750),
        cancelled,
    ];
    OwnerFixture {
        owner,
        messes: vec![first, second],
        subscriptions,
    }
}

#[rstest]
#[tokio::test]
async fn owner_dashboard_counts_only_effectively_active_subscriptions(
    owner_fixture: OwnerFixture,
) {
    let OwnerFixture {
        owner,
        messes,
        subscriptions,
    } = owner_fixture;
    let expected_ids: Vec<_> = messes.iter().map(Mess::id).collect();
    let mut mocks = Mocks::default();
    mocks
        .messes
        .expect_list_by_owner()
        .times(1)
        .return_once(move |_| Ok(messes));
    mocks
        .subscriptions
        .expect_list_by_messes()
        .withf(move |ids: &[MessId]| ids == expected_ids.as_slice())
        .times(1)
        .return_once(move |_| Ok(subscriptions));

    let dashboard = mocks
        .build()
        .owner_dashboard(&owner)
        .await
        .expect("dashboard computed");

    assert_eq!(dashboard.total_messes, 2);
    assert_eq!(dashboard.active_subscriptions, 2);
    assert_eq!(dashboard.total_revenue, dec!(3750));
    assert_eq!(dashboard.average_rating, dec!(4.50));
}

#[tokio::test]
async fn owner_without_messes_sees_zeroes() {
    let mut mocks = Mocks::default();
    mocks
        .messes
        .expect_list_by_owner()
        .return_once(|_| Ok(Vec::new()));
    mocks.subscriptions.expect_list_by_messes().times(0);

    let dashboard = mocks
        .build()
        .owner_dashboard(&actor(Role::Owner))
        .await
        .expect("dashboard computed");
    assert_eq!(dashboard, OwnerDashboard::default());
}

#[tokio::test]
async fn admin_dashboard_summarises_platform() {
    let owner_id = UserId::random();
    let users = vec![
        user(&UserId::random(), "Ravi Kumar", Role::Student),
        user(&UserId::random(), "Asha Rao", Role::Student),
        user(&owner_id, "Meena Patil", Role::Owner),
        user(&UserId::random(), "Admin", Role::Admin),
    ];
    let verified = verified_mess(&owner_id);
    let pending_mess = mess(&owner_id);
    let subscriptions = vec![
        subscription(verified.id(), Plan::Monthly, date(2025, 1, 1), 3000),
        subscription(verified.id(), Plan::Weekly, date(2025, 1, 1), 800),
    ];
    let complaint = |subject: &str| {
        Complaint::file(
            NewComplaint {
                id: ComplaintId::random(),
                mess_id: verified.id(),
                student_id: users[0].id().clone(),
                student_name: users[0].display_name().clone(),
                subject: subject.to_owned(),
                description: "See subject".to_owned(),
            },
            utc(2025, 1, 10, 0, 0),
        )
        .expect("valid complaint")
    };
    let mut resolved = complaint("Late lunch");
    resolved
        .resolve(utc(2025, 1, 11, 0, 0))
        .expect("resolve pending");
    let complaints = vec![complaint("Cold food"), resolved];
    let messes = vec![verified, pending_mess];

    let mut mocks = Mocks::default();
    mocks.users.expect_list_all().return_once(move || Ok(users));
    mocks.messes.expect_list_all().return_once(move || Ok(messes));
    mocks
        .complaints
        .expect_list_all()
        .return_once(move || Ok(complaints));
    mocks
        .subscriptions
        .expect_list_all()
        .return_once(move || Ok(subscriptions));

    let dashboard = mocks
        .build()
        .admin_dashboard(&actor(Role::Admin))
        .await
        .expect("dashboard computed");

    assert_eq!(
        dashboard,
        AdminDashboard {
            total_students: 2,
            total_owners: 1,
            total_messes: 2,
            unverified_messes: 1,
            pending_complaints: 1,
            active_subscriptions: 1,
        }
    );
}

#[rstest]
#[case(Role::Student, true)]
#[case(Role::Admin, true)]
#[case(Role::Student, false)]
#[case(Role::Owner, false)]
#[tokio::test]
async fn dashboards_are_role_gated(#[case] role: Role, #[case] owner_view: bool) {
    let service = Mocks::default().build();
    let caller = actor(role);
    let err = if owner_view {
        service.owner_dashboard(&caller).await.expect_err("forbidden")
    } else {
        service.admin_dashboard(&caller).await.expect_err("forbidden")
    };
    assert_eq!(err.code(), ErrorCode::Forbidden);
}
