//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rust_decimal_macros::dec;

use crate::domain::{
    Actor, DisplayName, EmailAddress, MealSchedule, Mess, MessDraft, MessId, MessType, Role, User,
    UserDraft, UserId,
};
use crate::test_support::MutableClock;

pub(crate) fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Clock frozen at `now`.
pub(crate) fn clock_at(now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(MutableClock::new(now))
}

/// 08:00 / 13:00 / 20:00 at UTC+05:30 with two hours' notice.
pub(crate) fn schedule() -> MealSchedule {
    let at = |h| NaiveTime::from_hms_opt(h, 0, 0).expect("valid time");
    MealSchedule::new(
        at(8),
        at(13),
        at(20),
        TimeDelta::hours(2),
        FixedOffset::east_opt(330 * 60).expect("valid offset"),
    )
}

pub(crate) fn actor(role: Role) -> Actor {
    Actor::new(UserId::random(), role)
}

pub(crate) fn user(id: &UserId, name: &str, role: Role) -> User {
    User::new(UserDraft {
        id: id.clone(),
        display_name: DisplayName::new(name).expect("valid name"),
        email: EmailAddress::new(format!("{}@example.com", id.as_uuid().simple()))
            .expect("valid email"),
        role,
        phone: None,
        created_at: utc(2024, 12, 1, 0, 0),
    })
    .expect("valid user")
}

pub(crate) fn mess_draft(name: &str, city: &str) -> MessDraft {
    MessDraft {
        name: name.to_owned(),
        description: None,
        address: "12 Station Road".to_owned(),
        city: city.to_owned(),
        state: "Maharashtra".to_owned(),
        mess_type: MessType::DineIn,
        contact_number: "+91 98765 43210".to_owned(),
        pricing_monthly: dec!(3000),
        pricing_weekly: dec!(800),
    }
}

/// Unverified mess owned by `owner_id`.
pub(crate) fn mess(owner_id: &UserId) -> Mess {
    Mess::register(
        MessId::random(),
        owner_id.clone(),
        mess_draft("Annapurna Mess", "Pune"),
        utc(2024, 12, 1, 0, 0),
    )
    .expect("valid mess")
}

pub(crate) fn verified_mess(owner_id: &UserId) -> Mess {
    let mut mess = mess(owner_id);
    mess.verify();
    mess
}
