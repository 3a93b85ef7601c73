//! Subscription lifecycle.
//!
//! ```text
//! active --pause--> paused --cancel--> cancelled
//!   \-----------------cancel----------/
//! ```
//!
//! `cancelled` is terminal and `paused` has no way back to `active`; a
//! student who paused re-subscribes instead. Expiry is never stored: a
//! subscription whose end date has passed stays `active` in storage and is
//! reported as expired when read.
//!
//! Every transition bumps `revision`. Adapters persist with the revision the
//! caller read, so two transitions racing from the same snapshot cannot both
//! land.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{MessId, MessType, Plan, Price, SkipMealId, SubscriptionId, UserId};

mod schedule;

pub use schedule::{MealSchedule, MealType};

/// Stored lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paid and serving meals until the end date.
    Active,
    /// Temporarily on hold; no meals are served.
    Paused,
    /// Terminal. The period is no longer served.
    Cancelled,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Errors raised while creating a subscription.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionValidationError {
    #[error("start date {start} is before today ({today})")]
    StartInPast { start: NaiveDate, today: NaiveDate },
    #[error("plan {plan} starting {start} runs past the supported calendar")]
    EndOutOfRange { plan: Plan, start: NaiveDate },
}

/// Errors raised by lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubscriptionTransitionError {
    #[error("subscription is {status}, expected active")]
    NotActive { status: SubscriptionStatus },
    #[error("subscription is already cancelled")]
    AlreadyCancelled,
    #[error("{date} is outside the subscription period {start}..={end}")]
    OutsidePeriod {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("{meal} on {date} can no longer be skipped")]
    WindowExpired { date: NaiveDate, meal: MealType },
}

/// A meal the student opted out of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipMeal {
    pub id: SkipMealId,
    pub date: NaiveDate,
    pub meal: MealType,
    pub created_at: DateTime<Utc>,
}

/// Result of a skip request; `replayed` is set when the slot was already
/// skipped and nothing changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipOutcome {
    pub skip: SkipMeal,
    pub replayed: bool,
}

/// Gateway references of the payment that funded a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReference {
    pub order_id: String,
    pub payment_id: String,
}

/// Inputs for [`Subscription::start`].
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub id: SubscriptionId,
    pub student_id: UserId,
    pub mess_id: MessId,
    pub plan: Plan,
    pub start_date: NaiveDate,
    pub price: Price,
    pub payment: PaymentReference,
}

/// A student's paid subscription to a mess.
///
/// ## Invariants
/// - `end_date` is `plan.end_date(start_date)`; it is never set directly.
/// - `price` is the amount paid at creation and never follows later price
///   changes.
/// - Skip entries are unique per `(date, meal)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    id: SubscriptionId,
    student_id: UserId,
    mess_id: MessId,
    plan: Plan,
    start_date: NaiveDate,
    end_date: NaiveDate,
    status: SubscriptionStatus,
    price: Price,
    payment: PaymentReference,
    skipped_meals: Vec<SkipMeal>,
    revision: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Subscription {
    /// Open an active subscription at revision 1.
    ///
    /// `today` is the local calendar date; a start before it is rejected.
    pub fn start(
        new: NewSubscription,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, SubscriptionValidationError> {
        if new.start_date < today {
            return Err(SubscriptionValidationError::StartInPast {
                start: new.start_date,
                today,
            });
        }
        let end_date = new.plan.end_date(new.start_date).ok_or(
            SubscriptionValidationError::EndOutOfRange {
                plan: new.plan,
                start: new.start_date,
            },
        )?;

        Ok(Self {
            id: new.id,
            student_id: new.student_id,
            mess_id: new.mess_id,
            plan: new.plan,
            start_date: new.start_date,
            end_date,
            status: SubscriptionStatus::Active,
            price: new.price,
            payment: new.payment,
            skipped_meals: Vec::new(),
            revision: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Stable subscription identifier.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Student who paid for the subscription.
    pub fn student_id(&self) -> &UserId {
        &self.student_id
    }

    /// Mess that serves the subscription.
    pub fn mess_id(&self) -> MessId {
        self.mess_id
    }

    /// Plan the student paid for.
    pub fn plan(&self) -> Plan {
        self.plan
    }

    /// First served date.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last served date, inclusive.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Stored lifecycle state. See [`Subscription::is_expired`] for the
    /// derived expiry.
    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    /// Price captured when the subscription was paid.
    pub fn price(&self) -> Price {
        self.price
    }

    /// Gateway order and payment that funded the subscription.
    pub fn payment(&self) -> &PaymentReference {
        &self.payment
    }

    /// Meals the student opted out of, in the order they were skipped.
    pub fn skipped_meals(&self) -> &[SkipMeal] {
        self.skipped_meals.as_slice()
    }

    /// Optimistic concurrency revision, starting at 1.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Timestamp of the last transition.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `date` falls inside the paid period.
    pub fn covers(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date)
    }

    /// Stored as active but past its end date.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.status == SubscriptionStatus::Active && self.end_date < today
    }

    /// Active and not expired on `today`.
    pub fn is_effectively_active(&self, today: NaiveDate) -> bool {
        self.status == SubscriptionStatus::Active && !self.is_expired(today)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.revision = self.revision.saturating_add(1);
        self.updated_at = now;
    }

    fn require_active(&self) -> Result<(), SubscriptionTransitionError> {
        if self.status == SubscriptionStatus::Active {
            Ok(())
        } else {
            Err(SubscriptionTransitionError::NotActive {
                status: self.status,
            })
        }
    }

    /// `active -> paused`.
    pub fn pause(&mut self, now: DateTime<Utc>) -> Result<(), SubscriptionTransitionError> {
        self.require_active()?;
        self.status = SubscriptionStatus::Paused;
        self.touch(now);
        Ok(())
    }

    /// `active | paused -> cancelled`.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<(), SubscriptionTransitionError> {
        if self.status == SubscriptionStatus::Cancelled {
            return Err(SubscriptionTransitionError::AlreadyCancelled);
        }
        self.status = SubscriptionStatus::Cancelled;
        self.touch(now);
        Ok(())
    }

    /// Skip `meal` on `date`.
    ///
    /// Checks run in order: the subscription is active, `date` lies in the
    /// subscription period, and the meal is at least `schedule.notice()`
    /// away from `now`. A slot that is already skipped is returned as a
    /// replay without bumping the revision.
    pub fn skip_meal(
        &mut self,
        id: SkipMealId,
        date: NaiveDate,
        meal: MealType,
        now: DateTime<Utc>,
        schedule: &MealSchedule,
    ) -> Result<SkipOutcome, SubscriptionTransitionError> {
        self.require_active()?;
        if !self.covers(date) {
            return Err(SubscriptionTransitionError::OutsidePeriod {
                date,
                start: self.start_date,
                end: self.end_date,
            });
        }
        let within_notice = schedule
            .scheduled_at(date, meal)
            .is_none_or(|scheduled| scheduled - now < schedule.notice());
        if within_notice {
            return Err(SubscriptionTransitionError::WindowExpired { date, meal });
        }

        if let Some(existing) = self
            .skipped_meals
            .iter()
            .find(|skip| skip.date == date && skip.meal == meal)
        {
            return Ok(SkipOutcome {
                skip: existing.clone(),
                replayed: true,
            });
        }

        let skip = SkipMeal {
            id,
            date,
            meal,
            created_at: now,
        };
        self.skipped_meals.push(skip.clone());
        self.touch(now);
        Ok(SkipOutcome {
            skip,
            replayed: false,
        })
    }
}

/// Mess details shown next to a student's subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessSummary {
    pub id: MessId,
    pub name: String,
    pub city: String,
    pub state: String,
    pub mess_type: MessType,
}

/// Read model returned by "my subscriptions".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    pub subscription: Subscription,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess: Option<MessSummary>,
    pub expired: bool,
}
