//! Demo dataset applied on startup when `seed_demo_data` is set.
//!
//! Everything goes through the driving ports, so the seed obeys the same
//! rules as real traffic: one administrator, one owner with a verified mess
//! and a published menu, and one student who has rated it.

use chrono::Weekday;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::ports::{RegisterUserRequest, SubmitRatingRequest};
use crate::domain::{Actor, DayMenu, Error, MessDraft, MessId, MessType, Role};
use crate::state::EngineState;

const ADMIN_EMAIL: &str = "admin@smartmess.example";
const OWNER_EMAIL: &str = "owner@smartmess.example";
const STUDENT_EMAIL: &str = "student@smartmess.example";

/// Identities and records created by [`seed_demo_data`].
#[derive(Debug, Clone)]
pub struct DemoSeed {
    pub admin: Actor,
    pub owner: Actor,
    pub student: Actor,
    pub mess_id: MessId,
}

async fn register(
    state: &EngineState,
    name: &str,
    email: &str,
    role: Role,
) -> Result<Actor, Error> {
    let user = state
        .identity
        .register_user(RegisterUserRequest {
            display_name: name.to_owned(),
            email: email.to_owned(),
            role,
            phone: None,
        })
        .await?;
    Ok(Actor::new(user.id().clone(), role))
}

fn demo_menu() -> Vec<DayMenu> {
    let mut day = Weekday::Mon;
    let mut days = Vec::with_capacity(7);
    for _ in 0..7 {
        let sunday = day == Weekday::Sun;
        days.push(DayMenu {
            day,
            breakfast: Some("Poha and chai".to_owned()),
            lunch: Some("Dal, rice, two rotis, sabzi".to_owned()),
            dinner: Some(
                if sunday {
                    "Paneer thali"
                } else {
                    "Khichdi and kadhi"
                }
                .to_owned(),
            ),
        });
        day = day.succ();
    }
    days
}

/// Create the demo dataset.
///
/// # Errors
///
/// Fails with `conflict` when the demo accounts already exist.
pub async fn seed_demo_data(state: &EngineState) -> Result<DemoSeed, Error> {
    let admin = register(state, "Platform Admin", ADMIN_EMAIL, Role::Admin).await?;
    let owner = register(state, "Meena Patil", OWNER_EMAIL, Role::Owner).await?;
    let student = register(state, "Ravi Kumar", STUDENT_EMAIL, Role::Student).await?;

    let mess = state
        .messes
        .register_mess(
            &owner,
            MessDraft {
                name: "Annapurna Mess".to_owned(),
                description: Some("Home-style vegetarian meals".to_owned()),
                address: "12 Station Road".to_owned(),
                city: "Pune".to_owned(),
                state: "Maharashtra".to_owned(),
                mess_type: MessType::Both,
                contact_number: "+91 98765 43210".to_owned(),
                pricing_monthly: Decimal::from(3000),
                pricing_weekly: Decimal::from(800),
            },
        )
        .await?;
    state.messes.verify_mess(&admin, mess.id()).await?;
    state
        .messes
        .update_menu(&owner, mess.id(), demo_menu())
        .await?;
    state
        .ratings
        .submit_rating(
            &student,
            SubmitRatingRequest {
                mess_id: mess.id(),
                value: 5,
                review: Some("Tastes like home".to_owned()),
            },
        )
        .await?;

    info!(mess_id = %mess.id(), "demo data seeded");
    Ok(DemoSeed {
        admin,
        owner,
        student,
        mess_id: mess.id(),
    })
}
