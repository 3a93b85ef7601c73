//! Mess registry entities.
//!
//! A mess is created unverified by its owner. Only an administrator can flip
//! the verification flag, and only verified messes are visible to search.
//! The rating aggregate is a projection of the mess's rating rows that the
//! rating adapter keeps in step with each insert.

use std::fmt;

use chrono::{DateTime, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{MessId, RatingAggregate, UserId};

mod menu;
mod pricing;
#[cfg(test)]
mod tests;

pub use menu::{DayMenu, WeeklyMenu};
pub use pricing::{Plan, Price, Pricing};

/// Validation errors raised by mess constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessValidationError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("price must be greater than zero (got {amount})")]
    NonPositivePrice { amount: Decimal },
    #[error("menu must cover all seven days (got {days})")]
    IncompleteMenu { days: usize },
    #[error("menu lists {day} more than once")]
    DuplicateMenuDay { day: Weekday },
    #[error("unknown mess type '{0}'")]
    UnknownMessType(String),
}

/// How a mess serves its meals.
///
/// ```
/// use smart_mess::domain::MessType;
///
/// assert_eq!("Dine_In".parse::<MessType>().ok(), Some(MessType::DineIn));
/// assert!("takeaway".parse::<MessType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessType {
    /// Students eat at the premises.
    DineIn,
    /// Tiffins are delivered.
    Delivery,
    /// Both dine-in and delivery.
    Both,
}

impl std::str::FromStr for MessType {
    type Err = MessValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dine-in" | "dine_in" | "dinein" => Ok(Self::DineIn),
            "delivery" => Ok(Self::Delivery),
            "both" => Ok(Self::Both),
            other => Err(MessValidationError::UnknownMessType(other.to_owned())),
        }
    }
}

impl fmt::Display for MessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DineIn => "dine-in",
            Self::Delivery => "delivery",
            Self::Both => "both",
        })
    }
}

/// Street address with the city and state used by search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
}

/// Owner-supplied registration details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub mess_type: MessType,
    pub contact_number: String,
    pub pricing_monthly: Decimal,
    pub pricing_weekly: Decimal,
}

fn required(value: &str, field: &'static str) -> Result<String, MessValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MessValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

/// Case-insensitive substring match used by search filters.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A registered meal-service provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mess {
    id: MessId,
    owner_id: UserId,
    name: String,
    description: Option<String>,
    location: Location,
    mess_type: MessType,
    contact_number: String,
    pricing: Pricing,
    menu: WeeklyMenu,
    verified: bool,
    rating: RatingAggregate,
    created_at: DateTime<Utc>,
}

impl Mess {
    /// Validate an owner's draft and create an unverified, unrated mess.
    pub fn register(
        id: MessId,
        owner_id: UserId,
        draft: MessDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, MessValidationError> {
        let name = required(&draft.name, "name")?;
        let address = required(&draft.address, "address")?;
        let city = required(&draft.city, "city")?;
        let state = required(&draft.state, "state")?;
        let contact_number = required(&draft.contact_number, "contact number")?;
        let pricing = Pricing {
            monthly: Price::new(draft.pricing_monthly)?,
            weekly: Price::new(draft.pricing_weekly)?,
        };
        let description = draft
            .description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());

        Ok(Self {
            id,
            owner_id,
            name,
            description,
            location: Location {
                address,
                city,
                state,
            },
            mess_type: draft.mess_type,
            contact_number,
            pricing,
            menu: WeeklyMenu::empty(),
            verified: false,
            rating: RatingAggregate::default(),
            created_at,
        })
    }

    /// Stable mess identifier.
    pub fn id(&self) -> MessId {
        self.id
    }

    /// Owner who registered the mess.
    pub fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional free-text description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Address used for search.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// How meals are served.
    pub fn mess_type(&self) -> MessType {
        self.mess_type
    }

    /// Phone number shown to students.
    pub fn contact_number(&self) -> &str {
        self.contact_number.as_str()
    }

    /// Current plan prices. Existing subscriptions keep the price they paid.
    pub fn pricing(&self) -> &Pricing {
        &self.pricing
    }

    /// Weekly menu, possibly with unset days.
    pub fn menu(&self) -> &WeeklyMenu {
        &self.menu
    }

    /// Whether an administrator has verified the mess.
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Running rating aggregate.
    pub fn rating(&self) -> &RatingAggregate {
        &self.rating
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `user_id` owns the mess.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }

    /// Mark the mess verified. Returns `true` when the flag flipped.
    pub fn verify(&mut self) -> bool {
        let changed = !self.verified;
        self.verified = true;
        changed
    }

    /// Replace the whole weekly menu.
    pub fn replace_menu(&mut self, menu: WeeklyMenu) {
        self.menu = menu;
    }

    /// Mutable access for the rating adapter, which must update the
    /// aggregate in the same critical section as the rating insert.
    pub fn rating_mut(&mut self) -> &mut RatingAggregate {
        &mut self.rating
    }

    /// Whether search may return this mess for `filter`.
    ///
    /// Unverified messes never match.
    pub fn matches_search(&self, filter: &MessSearch) -> bool {
        self.verified
            && filter
                .city()
                .is_none_or(|city| contains_folded(&self.location.city, city))
            && filter
                .state()
                .is_none_or(|state| contains_folded(&self.location.state, state))
    }
}

/// Search filters. Blank filters are ignored; matching is a
/// case-insensitive substring match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessSearch {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl MessSearch {
    fn non_blank(value: Option<&String>) -> Option<&str> {
        value.map(|text| text.trim()).filter(|text| !text.is_empty())
    }

    /// City filter, ignored when blank.
    pub fn city(&self) -> Option<&str> {
        Self::non_blank(self.city.as_ref())
    }

    /// State filter, ignored when blank.
    pub fn state(&self) -> Option<&str> {
        Self::non_blank(self.state.as_ref())
    }
}
