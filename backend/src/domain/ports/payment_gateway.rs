//! Port for the external payment collaborator.
//!
//! Payment is a two-phase protocol. The engine first asks the gateway to
//! open an order for an amount; the client pays against that order out of
//! band and returns a signed confirmation, which the engine hands back to
//! the gateway for verification before creating any subscription.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The gateway could not be reached.
        Connection { message: String } => "payment gateway unreachable: {message}",
        /// The gateway refused the order or the confirmation.
        Rejected { message: String } => "payment rejected: {message}",
        /// The confirmation names an order the gateway never issued.
        UnknownOrder { order_id: String } => "unknown payment order {order_id}",
    }
}

/// Order to open with the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Amount in minor currency units.
    pub amount_minor: i64,
    pub currency: String,
    /// Caller-side reference echoed back by the gateway.
    pub receipt: String,
}

/// Order issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub receipt: String,
}

/// Signed proof of payment returned by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Payment the gateway vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedPayment {
    pub order_id: String,
    pub payment_id: String,
    pub amount_minor: i64,
    /// Receipt the order was opened with.
    pub receipt: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest)
    -> Result<PaymentOrder, PaymentGatewayError>;

    /// Check the confirmation's signature and report the amount paid.
    ///
    /// An order verifies once; later confirmations for it report
    /// `UnknownOrder`.
    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<VerifiedPayment, PaymentGatewayError>;
}
