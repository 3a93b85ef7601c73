//! Sandbox payment gateway.
//!
//! Issues orders locally and signs confirmations with a shared secret, the
//! way a hosted checkout would. A client pays by calling
//! [`SandboxPaymentGateway::sign`] with the order and a payment id of its
//! choosing; [`PaymentGateway::verify_payment`] recomputes the signature
//! and reports the order's amount. A verified order is settled and leaves
//! the order book.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    OrderRequest, PaymentConfirmation, PaymentGateway, PaymentGatewayError, PaymentOrder,
    VerifiedPayment,
};

/// In-process gateway that signs with SHA-256 over a shared secret.
#[derive(Debug)]
pub struct SandboxPaymentGateway {
    secret: String,
    orders: Mutex<HashMap<String, PaymentOrder>>,
}

impl SandboxPaymentGateway {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            orders: Mutex::new(HashMap::new()),
        }
    }

    /// Signature a client presents for paying `order_id` as `payment_id`.
    ///
    /// # Examples
    /// ```
    /// use smart_mess::outbound::payment::SandboxPaymentGateway;
    ///
    /// let gateway = SandboxPaymentGateway::new("secret");
    /// let signature = gateway.sign("order_1", "pay_1");
    /// assert_eq!(signature.len(), 64);
    /// assert_eq!(signature, gateway.sign("order_1", "pay_1"));
    /// ```
    #[must_use]
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(order_id.as_bytes());
        hasher.update(b":");
        hasher.update(payment_id.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn orders(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, PaymentOrder>>, PaymentGatewayError> {
        self.orders
            .lock()
            .map_err(|err| PaymentGatewayError::connection(format!("order book poisoned: {err}")))
    }

    /// Number of orders opened but not yet settled.
    pub fn open_orders(&self) -> Result<usize, PaymentGatewayError> {
        Ok(self.orders()?.len())
    }
}

#[async_trait]
impl PaymentGateway for SandboxPaymentGateway {
    async fn create_order(
        &self,
        request: &OrderRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        if request.amount_minor <= 0 {
            return Err(PaymentGatewayError::rejected(format!(
                "order amount must be positive, got {}",
                request.amount_minor
            )));
        }
        let order = PaymentOrder {
            order_id: format!("order_{}", Uuid::new_v4().simple()),
            amount_minor: request.amount_minor,
            currency: request.currency.clone(),
            receipt: request.receipt.clone(),
        };
        self.orders()?
            .insert(order.order_id.clone(), order.clone());
        debug!(
            order_id = %order.order_id,
            amount_minor = order.amount_minor,
            "sandbox order opened"
        );
        Ok(order)
    }

    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerifiedPayment, PaymentGatewayError> {
        let expected = self.sign(&confirmation.order_id, &confirmation.payment_id);
        let order = match self.orders()?.entry(confirmation.order_id.clone()) {
            Entry::Vacant(_) => {
                return Err(PaymentGatewayError::unknown_order(&confirmation.order_id));
            }
            Entry::Occupied(_) if !expected.eq_ignore_ascii_case(confirmation.signature.trim()) => {
                return Err(PaymentGatewayError::rejected("signature mismatch"));
            }
            Entry::Occupied(open) => open.remove(),
        };
        debug!(order_id = %order.order_id, "sandbox order settled");
        Ok(VerifiedPayment {
            order_id: order.order_id,
            payment_id: confirmation.payment_id.clone(),
            amount_minor: order.amount_minor,
            receipt: order.receipt,
        })
    }
}
