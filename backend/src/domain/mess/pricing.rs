//! Plans and per-plan prices.

use std::fmt;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::MessValidationError;

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// Thirty days from the start date.
    Monthly,
    /// Seven days from the start date.
    Weekly,
}

impl Plan {
    /// Length of the plan in days.
    pub const fn duration_days(self) -> u64 {
        match self {
            Self::Monthly => 30,
            Self::Weekly => 7,
        }
    }

    /// Last covered date for a plan starting on `start`.
    ///
    /// Returns `None` only when the calendar overflows.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use smart_mess::domain::Plan;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
    /// let end = Plan::Monthly.end_date(start).expect("in range");
    /// assert_eq!(end, NaiveDate::from_ymd_opt(2025, 1, 31).expect("valid date"));
    /// ```
    pub fn end_date(self, start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_days(Days::new(self.duration_days()))
    }

    /// Wire name of the plan.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strictly positive amount of money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Validate that `amount` is greater than zero.
    pub fn new(amount: Decimal) -> Result<Self, MessValidationError> {
        if amount <= Decimal::ZERO {
            return Err(MessValidationError::NonPositivePrice { amount });
        }
        Ok(Self(amount))
    }

    /// Amount in major currency units.
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Amount in minor currency units (paise), rounded to the nearest unit.
    ///
    /// Returns `None` when the amount does not fit an `i64`.
    pub fn to_minor_units(self) -> Option<i64> {
        (self.0 * Decimal::ONE_HUNDRED).round().to_i64()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = MessValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Monthly and weekly prices of a mess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub monthly: Price,
    pub weekly: Price,
}

impl Pricing {
    /// Price currently charged for `plan`.
    pub const fn for_plan(&self, plan: Plan) -> Price {
        match plan {
            Plan::Monthly => self.monthly,
            Plan::Weekly => self.weekly,
        }
    }
}
