//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities of the mess engine, the
//! state machines that govern them, and the services that implement the
//! driving ports on top of the driven ports in [`ports`]. Nothing here
//! knows about transport or storage technology.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Actor / Capability: the authenticated caller and role gating.
//! - Mess, Rating, Subscription, Complaint: the engine's aggregates.
//! - OwnerDashboard / AdminDashboard: read-time projections.
//! - `*Service`: implementations of the driving ports.

pub mod auth;
pub mod complaint;
pub mod dashboard;
pub mod error;
pub mod ids;
pub mod mess;
pub mod ports;
pub mod rating;
pub mod subscription;
pub mod user;

mod complaint_service;
mod dashboard_service;
mod identity_service;
mod mess_service;
mod rating_service;
mod subscription_service;
#[cfg(test)]
pub(crate) mod service_test_helpers;

pub use self::auth::{Actor, Capability};
pub use self::complaint::{
    Complaint, ComplaintClosedError, ComplaintStatus, ComplaintValidationError, NewComplaint,
};
pub use self::complaint_service::ComplaintService;
pub use self::dashboard::{AdminDashboard, OwnerDashboard};
pub use self::dashboard_service::DashboardService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityService;
pub use self::ids::{ComplaintId, MessId, RatingId, SkipMealId, SubscriptionId};
pub use self::mess::{
    DayMenu, Location, Mess, MessDraft, MessSearch, MessType, MessValidationError, Plan, Price,
    Pricing, WeeklyMenu,
};
pub use self::mess_service::MessService;
pub use self::rating::{Rating, RatingAggregate, RatingValidationError, RatingValue};
pub use self::rating_service::RatingService;
pub use self::subscription::{
    MealSchedule, MealType, MessSummary, NewSubscription, PaymentReference, SkipMeal,
    SkipOutcome, Subscription, SubscriptionStatus, SubscriptionTransitionError,
    SubscriptionValidationError, SubscriptionView,
};
pub use self::subscription_service::{SubscriptionPolicy, SubscriptionService};
pub use self::user::{DisplayName, EmailAddress, Role, User, UserDraft, UserId, UserValidationError};

/// Convenient engine result alias.
///
/// # Examples
/// ```
/// use smart_mess::domain::{EngineResult, Error};
///
/// fn operation() -> EngineResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(operation().is_err());
/// ```
pub type EngineResult<T> = Result<T, Error>;
