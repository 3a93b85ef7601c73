//! Engine wiring: adapters in, driving ports out.
//!
//! [`EngineState`] is what an inbound adapter holds. Every field is a
//! driving port behind `Arc<dyn ...>`, so callers never see which adapters
//! back the services.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    ComplaintCommand, ComplaintQuery, DashboardQuery, IdentityCommand, IdentityQuery,
    MessCommand, MessQuery, RatingCommand, RatingQuery, SubscriptionCommand, SubscriptionQuery,
};
use crate::domain::{
    ComplaintService, DashboardService, IdentityService, MessService, RatingService,
    SubscriptionPolicy, SubscriptionService,
};
use crate::outbound::memory::InMemoryStore;
use crate::outbound::notifications::TracingNotificationSink;
use crate::outbound::payment::SandboxPaymentGateway;
use crate::settings::{EngineSettings, SettingsError};

/// Driving ports of a running engine.
#[derive(Clone)]
pub struct EngineState {
    pub identity: Arc<dyn IdentityCommand>,
    pub identity_query: Arc<dyn IdentityQuery>,
    pub messes: Arc<dyn MessCommand>,
    pub messes_query: Arc<dyn MessQuery>,
    pub ratings: Arc<dyn RatingCommand>,
    pub ratings_query: Arc<dyn RatingQuery>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionQuery>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub complaints_query: Arc<dyn ComplaintQuery>,
    pub dashboards: Arc<dyn DashboardQuery>,
    /// Sandbox gateway, exposed so local clients can sign confirmations.
    pub payments: Arc<SandboxPaymentGateway>,
}

/// Adapters backing an [`EngineState`].
pub struct EngineAdapters {
    pub store: Arc<InMemoryStore>,
    pub payments: Arc<SandboxPaymentGateway>,
    pub notifier: Arc<TracingNotificationSink>,
}

impl EngineAdapters {
    /// Fresh in-memory adapters signing with `payment_secret`.
    pub fn in_memory(payment_secret: &str) -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
            payments: Arc::new(SandboxPaymentGateway::new(payment_secret)),
            notifier: Arc::new(TracingNotificationSink),
        }
    }
}

impl EngineState {
    /// Build an in-memory engine from validated settings.
    pub fn from_settings(
        settings: &EngineSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SettingsError> {
        let policy = settings.subscription_policy()?;
        let adapters = EngineAdapters::in_memory(settings.payment_secret());
        Ok(Self::new(adapters, policy, clock))
    }

    pub fn new(
        adapters: EngineAdapters,
        policy: SubscriptionPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let EngineAdapters {
            store,
            payments,
            notifier,
        } = adapters;

        let identity = Arc::new(IdentityService::new(Arc::clone(&store), Arc::clone(&clock)));
        let messes = Arc::new(MessService::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::clone(&clock),
        ));
        let ratings = Arc::new(RatingService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
        ));
        let dashboards = Arc::new(DashboardService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&clock),
            policy.schedule,
        ));
        let subscriptions = Arc::new(SubscriptionService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&payments),
            Arc::clone(&notifier),
            Arc::clone(&clock),
            policy,
        ));
        let complaints = Arc::new(ComplaintService::new(
            Arc::clone(&store),
            Arc::clone(&store),
            store,
            notifier,
            clock,
        ));

        Self {
            identity: identity.clone(),
            identity_query: identity,
            messes: messes.clone(),
            messes_query: messes,
            ratings: ratings.clone(),
            ratings_query: ratings,
            subscriptions: subscriptions.clone(),
            subscriptions_query: subscriptions,
            complaints: complaints.clone(),
            complaints_query: complaints,
            dashboards,
            payments,
        }
    }
}
