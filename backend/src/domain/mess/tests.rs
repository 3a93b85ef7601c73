//! Tests for mess registry entities.

use chrono::{NaiveDate, TimeZone, Utc, Weekday};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

#[fixture]
fn draft() -> MessDraft {
    MessDraft {
        name: " Annapurna Mess ".to_owned(),
        description: Some("  ".to_owned()),
        address: "12 Station Road".to_owned(),
        city: "Pune".to_owned(),
        state: "Maharashtra".to_owned(),
        mess_type: MessType::Both,
        contact_number: "+91 98765 43210".to_owned(),
        pricing_monthly: dec!(3000),
        pricing_weekly: dec!(800),
    }
}

fn register(draft: MessDraft) -> Result<Mess, MessValidationError> {
    let created_at = Utc
        .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Mess::register(MessId::random(), UserId::random(), draft, created_at)
}

fn full_week() -> Vec<DayMenu> {
    [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
    .into_iter()
    .map(|day| DayMenu {
        day,
        breakfast: Some(" Poha ".to_owned()),
        lunch: Some(String::new()),
        dinner: None,
    })
    .collect()
}

#[rstest]
fn register_creates_unverified_unrated_mess(draft: MessDraft) {
    let mess = register(draft).expect("valid draft");
    assert_eq!(mess.name(), "Annapurna Mess");
    assert!(!mess.is_verified());
    assert_eq!(mess.rating().count(), 0);
    assert_eq!(mess.rating().average(), Decimal::ZERO);
    assert!(mess.menu().is_empty());
    assert!(mess.description().is_none());
}

#[rstest]
#[case::name(|d: &mut MessDraft| d.name = "  ".to_owned(), "name")]
#[case::address(|d: &mut MessDraft| d.address = String::new(), "address")]
#[case::city(|d: &mut MessDraft| d.city = " ".to_owned(), "city")]
#[case::state(|d: &mut MessDraft| d.state = String::new(), "state")]
#[case::contact(|d: &mut MessDraft| d.contact_number = String::new(), "contact number")]
fn register_rejects_missing_fields(
    mut draft: MessDraft,
    #[case] mutate: fn(&mut MessDraft),
    #[case] field: &'static str,
) {
    mutate(&mut draft);
    let err = register(draft).expect_err("missing field");
    assert_eq!(err, MessValidationError::MissingField { field });
}

#[rstest]
#[case(dec!(0), dec!(800))]
#[case(dec!(3000), dec!(-1))]
fn register_rejects_non_positive_prices(
    mut draft: MessDraft,
    #[case] monthly: Decimal,
    #[case] weekly: Decimal,
) {
    draft.pricing_monthly = monthly;
    draft.pricing_weekly = weekly;
    let err = register(draft).expect_err("non-positive price");
    assert!(matches!(err, MessValidationError::NonPositivePrice { .. }));
}

#[rstest]
fn verify_reports_whether_the_flag_flipped(draft: MessDraft) {
    let mut mess = register(draft).expect("valid draft");
    assert!(mess.verify());
    assert!(!mess.verify());
    assert!(mess.is_verified());
}

#[rstest]
#[case(Some("pune"), None, true)]
#[case(Some(" PUN "), Some("maha"), true)]
#[case(Some("Mumbai"), None, false)]
#[case(Some("   "), Some(""), true)]
#[case(None, Some("Karnataka"), false)]
fn search_matches_case_insensitive_substrings(
    draft: MessDraft,
    #[case] city: Option<&str>,
    #[case] state: Option<&str>,
    #[case] expected: bool,
) {
    let mut mess = register(draft).expect("valid draft");
    mess.verify();
    let filter = MessSearch {
        city: city.map(str::to_owned),
        state: state.map(str::to_owned),
    };
    assert_eq!(mess.matches_search(&filter), expected);
}

#[rstest]
fn unverified_mess_never_matches_search(draft: MessDraft) {
    let mess = register(draft).expect("valid draft");
    assert!(!mess.matches_search(&MessSearch::default()));
}

#[rstest]
fn weekly_menu_orders_days_and_normalises_text() {
    let menu = WeeklyMenu::new(full_week()).expect("seven days");
    assert_eq!(menu.days().len(), 7);
    assert_eq!(menu.days()[0].day, Weekday::Mon);
    assert_eq!(menu.days()[6].day, Weekday::Sun);
    let monday = menu.day(Weekday::Mon).expect("monday present");
    assert_eq!(monday.breakfast.as_deref(), Some("Poha"));
    assert!(monday.lunch.is_none());
}

#[rstest]
fn weekly_menu_requires_seven_days() {
    let mut days = full_week();
    days.pop();
    let err = WeeklyMenu::new(days).expect_err("six days");
    assert_eq!(err, MessValidationError::IncompleteMenu { days: 6 });
}

#[rstest]
fn weekly_menu_rejects_duplicate_days() {
    let mut days = full_week();
    days[0].day = Weekday::Mon;
    let err = WeeklyMenu::new(days).expect_err("monday twice");
    assert_eq!(
        err,
        MessValidationError::DuplicateMenuDay { day: Weekday::Mon }
    );
}

#[rstest]
#[case(Plan::Monthly, (2025, 1, 1), (2025, 1, 31))]
#[case(Plan::Weekly, (2025, 1, 1), (2025, 1, 8))]
#[case(Plan::Monthly, (2024, 2, 15), (2024, 3, 16))]
fn plan_end_date_is_start_plus_duration(
    #[case] plan: Plan,
    #[case] start: (i32, u32, u32),
    #[case] end: (i32, u32, u32),
) {
    let start = NaiveDate::from_ymd_opt(start.0, start.1, start.2).expect("valid date");
    let end = NaiveDate::from_ymd_opt(end.0, end.1, end.2).expect("valid date");
    assert_eq!(plan.end_date(start), Some(end));
}

#[rstest]
fn pricing_selects_plan_price(draft: MessDraft) {
    let mess = register(draft).expect("valid draft");
    assert_eq!(mess.pricing().for_plan(Plan::Monthly).amount(), dec!(3000));
    assert_eq!(mess.pricing().for_plan(Plan::Weekly).amount(), dec!(800));
}

#[rstest]
fn mess_type_uses_kebab_case_labels() {
    let value = serde_json::to_value(MessType::DineIn).expect("serialise");
    assert_eq!(value, serde_json::json!("dine-in"));
    assert_eq!("Dine-In".parse::<MessType>(), Ok(MessType::DineIn));
}

#[rstest]
fn price_rejects_zero_when_deserialising() {
    let result: Result<Price, _> = serde_json::from_value(serde_json::json!("0"));
    assert!(result.is_err());
}
