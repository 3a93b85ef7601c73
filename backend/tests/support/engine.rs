//! In-memory engine harness shared by the behavioural suites.
//!
//! Steps are synchronous, so the harness owns a current-thread runtime and
//! blocks on each driving-port call.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;
use smart_mess::domain::ports::RegisterUserRequest;
use smart_mess::domain::{
    Actor, MealSchedule, Mess, MessDraft, MessType, Role, SubscriptionPolicy,
};
use smart_mess::settings::DEFAULT_PAYMENT_SECRET;
use smart_mess::state::{EngineAdapters, EngineState};
use smart_mess::test_support::MutableClock;
use tokio::runtime::{Builder, Runtime};

/// 2025-01-01 06:00 UTC, 11:30 in the engine's default UTC+05:30.
pub fn new_year_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub struct Engine {
    runtime: Runtime,
    pub state: EngineState,
    pub clock: Arc<MutableClock>,
}

impl Engine {
    pub fn new(now: DateTime<Utc>) -> Self {
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).expect("valid time");
        let schedule = MealSchedule::new(
            at(8),
            at(13),
            at(20),
            TimeDelta::hours(2),
            FixedOffset::east_opt(330 * 60).expect("valid offset"),
        );
        let clock = Arc::new(MutableClock::new(now));
        let state = EngineState::new(
            EngineAdapters::in_memory(DEFAULT_PAYMENT_SECRET),
            SubscriptionPolicy {
                schedule,
                currency: "INR".to_owned(),
            },
            clock.clone(),
        );
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        Self {
            runtime,
            state,
            clock,
        }
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    pub fn register(&self, name: &str, role: Role) -> Actor {
        let email = format!("{}@bdd.example", name.to_lowercase().replace(' ', "."));
        let user = self
            .block_on(self.state.identity.register_user(RegisterUserRequest {
                display_name: name.to_owned(),
                email,
                role,
                phone: None,
            }))
            .expect("registered user");
        Actor::new(user.id().clone(), role)
    }

    pub fn register_mess(&self, owner: &Actor, name: &str, city: &str) -> Mess {
        self.block_on(self.state.messes.register_mess(
            owner,
            MessDraft {
                name: name.to_owned(),
                description: None,
                address: "1 Market Lane".to_owned(),
                city: city.to_owned(),
                state: "Maharashtra".to_owned(),
                mess_type: MessType::DineIn,
                contact_number: "+91 90000 00000".to_owned(),
                pricing_monthly: Decimal::from(3000),
                pricing_weekly: Decimal::from(800),
            },
        ))
        .expect("registered mess")
    }

    pub fn verify(&self, admin: &Actor, mess: &Mess) -> Mess {
        self.block_on(self.state.messes.verify_mess(admin, mess.id()))
            .expect("verified mess")
            .mess
    }
}
