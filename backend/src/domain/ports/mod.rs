//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`PaymentGateway`], [`NotificationSink`])
//! describe what the engine needs from adapters. Each exposes a typed error
//! enum so adapters map their failures into predictable variants. Driving
//! ports (`*Command`, `*Query`) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod complaint_command;
mod complaint_query;
mod complaint_repository;
mod dashboard_query;
mod identity_command;
mod identity_query;
mod mess_command;
mod mess_query;
mod mess_repository;
mod notification_sink;
mod payment_gateway;
mod rating_command;
mod rating_query;
mod rating_repository;
mod subscription_command;
mod subscription_query;
mod subscription_repository;
mod user_repository;

pub use complaint_command::{ComplaintCommand, FileComplaintRequest, SendWarningRequest};
pub use complaint_query::ComplaintQuery;
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{ComplaintRepository, ComplaintRepositoryError};
pub use dashboard_query::DashboardQuery;
pub use identity_command::{IdentityCommand, RegisterUserRequest};
pub use identity_query::IdentityQuery;
pub use mess_command::{MessCommand, VerifyMessResponse};
pub use mess_query::MessQuery;
#[cfg(test)]
pub use mess_repository::MockMessRepository;
pub use mess_repository::{MessRepository, MessRepositoryError};
#[cfg(test)]
pub use notification_sink::MockNotificationSink;
pub use notification_sink::{
    FixtureNotificationSink, Notification, NotificationError, NotificationSink,
};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    OrderRequest, PaymentConfirmation, PaymentGateway, PaymentGatewayError, PaymentOrder,
    VerifiedPayment,
};
pub use rating_command::{RatingCommand, SubmitRatingRequest, SubmitRatingResponse};
pub use rating_query::RatingQuery;
#[cfg(test)]
pub use rating_repository::MockRatingRepository;
pub use rating_repository::{RatingRepository, RatingRepositoryError};
pub use subscription_command::{
    CreateSubscriptionResponse, SkipMealRequest, SubscriptionCommand, SubscriptionDraft,
};
pub use subscription_query::SubscriptionQuery;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
