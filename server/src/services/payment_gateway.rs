//! Simulated payment processing.
//!
//! Nothing is charged anywhere: the gateway approves a configurable share of
//! requests at random and declines the rest.

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::PaymentMethod;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentGatewayError {
    #[error("Payment declined: {reason}")]
    Declined { reason: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charges `amount` using `method`.
    ///
    /// # Errors
    ///
    /// Returns an error when the charge is declined or the amount is negative.
    async fn charge(&self, amount: Decimal, method: PaymentMethod)
        -> Result<(), PaymentGatewayError>;
}

#[derive(Debug, Clone, Copy)]
pub struct SimulatedGateway {
    success_rate: f64,
}

impl SimulatedGateway {
    /// `success_rate` is clamped to `[0, 1]`.
    pub fn new(success_rate: f64) -> Self {
        let success_rate = if success_rate.is_nan() {
            0.0
        } else {
            success_rate.clamp(0.0, 1.0)
        };
        Self { success_rate }
    }

    pub fn always_approve() -> Self {
        Self::new(1.0)
    }

    pub fn always_decline() -> Self {
        Self::new(0.0)
    }

    fn roll(&self) -> bool {
        rand::thread_rng().gen_bool(self.success_rate)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(0.9)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(
        &self,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<(), PaymentGatewayError> {
        if amount.is_sign_negative() {
            return Err(PaymentGatewayError::InvalidAmount(amount));
        }

        if self.roll() {
            tracing::debug!(%amount, ?method, "Simulated charge approved");
            Ok(())
        } else {
            tracing::info!(%amount, ?method, "Simulated charge declined");
            Err(PaymentGatewayError::Declined {
                reason: "Payment failed. Please try again.".to_string(),
            })
        }
    }
}
