//! Subscription lifecycle services.
//!
//! Creation follows the two-phase payment protocol: `create_order` prices
//! the draft and opens a gateway order, then `create_subscription` accepts
//! the signed confirmation, has the gateway verify it, and only then stores
//! an active subscription. Creation is idempotent on the payment order id.
//!
//! Transitions load the aggregate, apply the state machine, and save with
//! the revision they read. A concurrent writer that got there first turns
//! the save into a `conflict`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::mess_service::{map_mess_error, notify_best_effort};
use crate::domain::ports::{
    CreateSubscriptionResponse, MessRepository, Notification, NotificationSink, OrderRequest,
    PaymentConfirmation, PaymentGateway, PaymentGatewayError, PaymentOrder, SkipMealRequest,
    SubscriptionCommand, SubscriptionDraft, SubscriptionQuery, SubscriptionRepository,
    SubscriptionRepositoryError,
};
use crate::domain::{
    Actor, Capability, Error, MealSchedule, Mess, MessId, MessSummary, NewSubscription,
    PaymentReference, Price, SkipMealId, SkipOutcome, Subscription, SubscriptionId,
    SubscriptionTransitionError, SubscriptionValidationError, SubscriptionView,
};

pub(crate) fn map_subscription_error(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
        SubscriptionRepositoryError::DuplicatePaymentOrder { order_id } => Error::conflict(
            format!("payment order {order_id} already funded a subscription"),
        ),
        SubscriptionRepositoryError::RevisionMismatch { expected, actual } => {
            Error::conflict("subscription was modified concurrently").with_details(json!({
                "expectedRevision": expected,
                "actualRevision": actual,
                "code": "revision_mismatch",
            }))
        }
        SubscriptionRepositoryError::NotFound { subscription_id } => {
            Error::not_found(format!("subscription {subscription_id} not found"))
        }
    }
}

/// Reference that ties a gateway order to the mess, plan and start it pays for.
fn order_receipt(mess_id: MessId, draft: &SubscriptionDraft) -> String {
    format!("{mess_id}:{}:{}", draft.plan, draft.start_date)
}

fn map_payment_error(error: PaymentGatewayError) -> Error {
    match error {
        PaymentGatewayError::Connection { message } => {
            Error::service_unavailable(format!("payment gateway unavailable: {message}"))
        }
        PaymentGatewayError::Rejected { message } => {
            Error::payment_failed(format!("payment rejected: {message}"))
        }
        PaymentGatewayError::UnknownOrder { order_id } => {
            Error::payment_failed(format!("unknown payment order {order_id}"))
        }
    }
}

fn map_transition_error(error: SubscriptionTransitionError) -> Error {
    match &error {
        SubscriptionTransitionError::NotActive { .. }
        | SubscriptionTransitionError::AlreadyCancelled => Error::invalid_state(error.to_string()),
        SubscriptionTransitionError::OutsidePeriod { .. } => {
            Error::invalid_request(error.to_string())
        }
        SubscriptionTransitionError::WindowExpired { .. } => {
            Error::window_expired(error.to_string())
        }
    }
}

fn map_validation_error(error: SubscriptionValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

fn minor_units(price: Price) -> Result<i64, Error> {
    price
        .to_minor_units()
        .ok_or_else(|| Error::internal(format!("price {price} does not fit minor units")))
}

/// Settings the subscription service needs besides its ports.
#[derive(Debug, Clone)]
pub struct SubscriptionPolicy {
    pub schedule: MealSchedule,
    pub currency: String,
}

/// Subscription service implementing the lifecycle driving ports.
#[derive(Clone)]
pub struct SubscriptionService<S, M, P, N> {
    subscription_repo: Arc<S>,
    mess_repo: Arc<M>,
    payments: Arc<P>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    policy: SubscriptionPolicy,
}

impl<S, M, P, N> SubscriptionService<S, M, P, N> {
    pub fn new(
        subscription_repo: Arc<S>,
        mess_repo: Arc<M>,
        payments: Arc<P>,
        notifier: Arc<N>,
        clock: Arc<dyn Clock>,
        policy: SubscriptionPolicy,
    ) -> Self {
        Self {
            subscription_repo,
            mess_repo,
            payments,
            notifier,
            clock,
            policy,
        }
    }
}

impl<S, M, P, N> SubscriptionService<S, M, P, N>
where
    S: SubscriptionRepository,
    M: MessRepository,
    P: PaymentGateway,
    N: NotificationSink,
{
    fn today(&self) -> NaiveDate {
        self.policy.schedule.local_date(self.clock.utc())
    }

    /// Load a mess that can be subscribed to and check the draft's dates.
    async fn subscribable_mess(&self, draft: &SubscriptionDraft) -> Result<Mess, Error> {
        let mess = self
            .mess_repo
            .find_by_id(draft.mess_id)
            .await
            .map_err(map_mess_error)?
            .ok_or_else(|| Error::not_found(format!("mess {} not found", draft.mess_id)))?;
        if !mess.is_verified() {
            return Err(Error::invalid_state(format!(
                "mess {} is not verified yet",
                draft.mess_id
            )));
        }

        let today = self.today();
        if draft.start_date < today {
            return Err(map_validation_error(
                SubscriptionValidationError::StartInPast {
                    start: draft.start_date,
                    today,
                },
            ));
        }
        Ok(mess)
    }

    async fn load_owned(&self, actor: &Actor, id: SubscriptionId) -> Result<Subscription, Error> {
        actor.require(Capability::ManageOwnSubscriptions)?;
        let subscription = self
            .subscription_repo
            .find_by_id(id)
            .await
            .map_err(map_subscription_error)?
            .ok_or_else(|| Error::not_found(format!("subscription {id} not found")))?;
        actor.require_self(subscription.student_id(), "subscription")?;
        Ok(subscription)
    }

    async fn persist(&self, subscription: &Subscription, read_revision: u32) -> Result<(), Error> {
        self.subscription_repo
            .save(subscription, read_revision)
            .await
            .map_err(map_subscription_error)
    }

    /// Resolve a stored subscription for a reused payment order.
    fn replay(actor: &Actor, existing: Subscription) -> Result<CreateSubscriptionResponse, Error> {
        if existing.student_id() != &actor.user_id {
            return Err(Error::conflict(format!(
                "payment order {} belongs to another subscription",
                existing.payment().order_id
            )));
        }
        debug!(subscription_id = %existing.id(), "subscription creation replayed");
        Ok(CreateSubscriptionResponse {
            subscription: existing,
            replayed: true,
        })
    }

    async fn find_by_order(&self, order_id: &str) -> Result<Option<Subscription>, Error> {
        self.subscription_repo
            .find_by_order_id(order_id)
            .await
            .map_err(map_subscription_error)
    }

    async fn handle_duplicate_order_race(
        &self,
        actor: &Actor,
        order_id: &str,
    ) -> Result<CreateSubscriptionResponse, Error> {
        match self.find_by_order(order_id).await? {
            Some(existing) => Self::replay(actor, existing),
            None => Err(Error::internal(
                "subscription disappeared during duplicate order resolution",
            )),
        }
    }
}

fn require_confirmation(confirmation: &PaymentConfirmation) -> Result<(), Error> {
    let blank = [
        &confirmation.order_id,
        &confirmation.payment_id,
        &confirmation.signature,
    ]
    .iter()
    .any(|field| field.trim().is_empty());
    if blank {
        return Err(Error::payment_failed("payment confirmation is incomplete"));
    }
    Ok(())
}

#[async_trait]
impl<S, M, P, N> SubscriptionCommand for SubscriptionService<S, M, P, N>
where
    S: SubscriptionRepository,
    M: MessRepository,
    P: PaymentGateway,
    N: NotificationSink,
{
    async fn create_order(
        &self,
        actor: &Actor,
        draft: SubscriptionDraft,
    ) -> Result<PaymentOrder, Error> {
        actor.require(Capability::Subscribe)?;
        let mess = self.subscribable_mess(&draft).await?;
        let price = mess.pricing().for_plan(draft.plan);

        let request = OrderRequest {
            amount_minor: minor_units(price)?,
            currency: self.policy.currency.clone(),
            receipt: order_receipt(mess.id(), &draft),
        };
        let order = self
            .payments
            .create_order(&request)
            .await
            .map_err(map_payment_error)?;

        info!(
            order_id = %order.order_id,
            mess_id = %mess.id(),
            plan = %draft.plan,
            amount_minor = order.amount_minor,
            "payment order created"
        );
        Ok(order)
    }

    async fn create_subscription(
        &self,
        actor: &Actor,
        draft: SubscriptionDraft,
        confirmation: PaymentConfirmation,
    ) -> Result<CreateSubscriptionResponse, Error> {
        actor.require(Capability::Subscribe)?;
        require_confirmation(&confirmation)?;

        if let Some(existing) = self.find_by_order(&confirmation.order_id).await? {
            return Self::replay(actor, existing);
        }

        let mess = self.subscribable_mess(&draft).await?;
        let price = mess.pricing().for_plan(draft.plan);

        let verified = match self.payments.verify_payment(&confirmation).await {
            Ok(verified) => verified,
            // A concurrent request may have settled the order in the meantime.
            Err(err @ PaymentGatewayError::UnknownOrder { .. }) => {
                if let Some(existing) = self.find_by_order(&confirmation.order_id).await? {
                    return Self::replay(actor, existing);
                }
                return Err(map_payment_error(err));
            }
            Err(err) => return Err(map_payment_error(err)),
        };
        if verified.receipt != order_receipt(mess.id(), &draft) {
            warn!(
                order_id = %verified.order_id,
                receipt = %verified.receipt,
                mess_id = %mess.id(),
                "payment order funds a different subscription"
            );
            return Err(Error::payment_failed(format!(
                "payment order {} was opened for a different subscription",
                verified.order_id
            )));
        }
        let expected_minor = minor_units(price)?;
        if verified.amount_minor != expected_minor {
            return Err(Error::payment_failed(format!(
                "paid {} minor units but the {} plan costs {expected_minor}",
                verified.amount_minor, draft.plan
            )));
        }

        let subscription = Subscription::start(
            NewSubscription {
                id: SubscriptionId::random(),
                student_id: actor.user_id.clone(),
                mess_id: mess.id(),
                plan: draft.plan,
                start_date: draft.start_date,
                price,
                payment: PaymentReference {
                    order_id: verified.order_id,
                    payment_id: verified.payment_id,
                },
            },
            self.today(),
            self.clock.utc(),
        )
        .map_err(map_validation_error)?;

        match self.subscription_repo.insert(&subscription).await {
            Ok(()) => {}
            Err(SubscriptionRepositoryError::DuplicatePaymentOrder { order_id }) => {
                return self.handle_duplicate_order_race(actor, &order_id).await;
            }
            Err(err) => return Err(map_subscription_error(err)),
        }

        info!(
            subscription_id = %subscription.id(),
            mess_id = %subscription.mess_id(),
            plan = %subscription.plan(),
            start = %subscription.start_date(),
            end = %subscription.end_date(),
            "subscription created"
        );
        notify_best_effort(
            self.notifier.as_ref(),
            Notification::SubscriptionConfirmed {
                student_id: actor.user_id.clone(),
                subscription_id: subscription.id(),
                mess_name: mess.name().to_owned(),
            },
        )
        .await;

        Ok(CreateSubscriptionResponse {
            subscription,
            replayed: false,
        })
    }

    async fn pause(&self, actor: &Actor, id: SubscriptionId) -> Result<Subscription, Error> {
        let mut subscription = self.load_owned(actor, id).await?;
        let read_revision = subscription.revision();
        subscription
            .pause(self.clock.utc())
            .map_err(map_transition_error)?;
        self.persist(&subscription, read_revision).await?;

        info!(subscription_id = %id, "subscription paused");
        Ok(subscription)
    }

    async fn cancel(&self, actor: &Actor, id: SubscriptionId) -> Result<Subscription, Error> {
        let mut subscription = self.load_owned(actor, id).await?;
        let read_revision = subscription.revision();
        subscription
            .cancel(self.clock.utc())
            .map_err(map_transition_error)?;
        self.persist(&subscription, read_revision).await?;

        info!(subscription_id = %id, "subscription cancelled");
        Ok(subscription)
    }

    async fn skip_meal(
        &self,
        actor: &Actor,
        request: SkipMealRequest,
    ) -> Result<SkipOutcome, Error> {
        let mut subscription = self.load_owned(actor, request.subscription_id).await?;
        let read_revision = subscription.revision();
        let outcome = subscription
            .skip_meal(
                SkipMealId::random(),
                request.date,
                request.meal,
                self.clock.utc(),
                &self.policy.schedule,
            )
            .map_err(map_transition_error)?;

        if !outcome.replayed {
            self.persist(&subscription, read_revision).await?;
            info!(
                subscription_id = %request.subscription_id,
                date = %request.date,
                meal = %request.meal,
                "meal skipped"
            );
        }
        Ok(outcome)
    }
}

#[async_trait]
impl<S, M, P, N> SubscriptionQuery for SubscriptionService<S, M, P, N>
where
    S: SubscriptionRepository,
    M: MessRepository,
    P: PaymentGateway,
    N: NotificationSink,
{
    async fn list_my_subscriptions(&self, actor: &Actor) -> Result<Vec<SubscriptionView>, Error> {
        actor.require(Capability::ManageOwnSubscriptions)?;
        let subscriptions = self
            .subscription_repo
            .list_by_student(&actor.user_id)
            .await
            .map_err(map_subscription_error)?;

        let today = self.today();
        let mut summaries: HashMap<MessId, Option<MessSummary>> = HashMap::new();
        let mut views = Vec::with_capacity(subscriptions.len());
        for subscription in subscriptions {
            let mess_id = subscription.mess_id();
            if !summaries.contains_key(&mess_id) {
                let summary = self
                    .mess_repo
                    .find_by_id(mess_id)
                    .await
                    .map_err(map_mess_error)?
                    .map(|mess| MessSummary {
                        id: mess.id(),
                        name: mess.name().to_owned(),
                        city: mess.location().city.clone(),
                        state: mess.location().state.clone(),
                        mess_type: mess.mess_type(),
                    });
                summaries.insert(mess_id, summary);
            }
            views.push(SubscriptionView {
                expired: subscription.is_expired(today),
                mess: summaries.get(&mess_id).cloned().flatten(),
                subscription,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
#[path = "subscription_service_tests.rs"]
mod tests;
