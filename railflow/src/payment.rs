//! Simulated payment gateway.
//!
//! This module provides a simplified payment gateway interface compatible
//! with UPI/card/net-banking flows. In production, this would be replaced
//! with an actual payment service integration; here the outcome is a die
//! roll with a configurable failure rate.

use crate::types::{Money, PaymentMode};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, PaymentGatewayError>;

/// Payment gateway error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentGatewayError {
    /// Payment declined by the (simulated) bank
    Declined {
        /// Human-readable decline reason
        reason: String,
    },
    /// Gateway timeout
    Timeout,
    /// Other error
    Other {
        /// Error message
        message: String,
    },
}

impl std::fmt::Display for PaymentGatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declined { reason } => write!(f, "{reason}"),
            Self::Timeout => write!(f, "Gateway timeout"),
            Self::Other { message } => write!(f, "Payment error: {message}"),
        }
    }
}

impl std::error::Error for PaymentGatewayError {}

/// Completed payment details returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// Gateway transaction ID
    pub transaction_id: String,
    /// Amount charged (fare plus convenience fee)
    pub amount: Money,
    /// Payment mode used
    pub mode: PaymentMode,
}

/// Convenience fee charged on top of the fare, by payment mode.
///
/// UPI is free, cards cost 2 % (rounded to the nearest rupee), net banking a
/// flat ₹15.
#[must_use]
pub fn convenience_fee(mode: PaymentMode, amount: Money) -> Money {
    match mode {
        PaymentMode::Upi => Money::ZERO,
        PaymentMode::Card => Money::from_rupees((amount.rupees() * 2 + 50) / 100),
        PaymentMode::NetBanking => Money::from_rupees(15),
    }
}

/// Payment gateway trait
///
/// Abstraction over payment processors so the booking reducer can run the
/// charge as an effect and tests can inject deterministic outcomes.
pub trait PaymentGateway: Send + Sync {
    /// Charge the given amount
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentGatewayError`] when the charge is declined; the
    /// reason is suitable for direct display to the user.
    fn charge(
        &self,
        amount: Money,
        mode: PaymentMode,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>>;
}

/// Simulated gateway: succeeds except for a configurable fraction of attempts.
#[derive(Clone, Debug)]
pub struct SimulatedGateway {
    failure_rate: f64,
}

impl SimulatedGateway {
    /// Decline message shown to the user on a simulated failure
    pub const DECLINE_REASON: &'static str =
        "Payment timed out. Please check your bank and retry.";

    /// Create a gateway failing `failure_rate` of attempts (0.0 ..= 1.0)
    #[must_use]
    pub const fn new(failure_rate: f64) -> Self {
        Self { failure_rate }
    }

    /// Gateway that approves every charge (deterministic, for tests/demos)
    #[must_use]
    pub const fn always_succeeds() -> Self {
        Self::new(0.0)
    }

    /// Gateway that declines every charge (deterministic, for tests/demos)
    #[must_use]
    pub const fn always_fails() -> Self {
        Self::new(1.0)
    }

    /// Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn PaymentGateway> {
        Arc::new(self)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(
        &self,
        amount: Money,
        mode: PaymentMode,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        let failure_rate = self.failure_rate;
        Box::pin(async move {
            let roll: f64 = rand::thread_rng().gen_range(0.0..1.0);
            if roll < failure_rate {
                tracing::info!(%amount, ?mode, "Simulated payment declined");
                return Err(PaymentGatewayError::Declined {
                    reason: Self::DECLINE_REASON.to_string(),
                });
            }

            let transaction_id = format!("TXN{}", rand::thread_rng().gen_range(10_000_000_u64..100_000_000));
            tracing::info!(%amount, ?mode, %transaction_id, "Simulated payment approved");
            Ok(PaymentReceipt {
                transaction_id,
                amount,
                mode,
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_convenience_fee_table() {
        let fare = Money::from_rupees(2800);
        assert_eq!(convenience_fee(PaymentMode::Upi, fare), Money::ZERO);
        assert_eq!(convenience_fee(PaymentMode::Card, fare), Money::from_rupees(56));
        assert_eq!(
            convenience_fee(PaymentMode::NetBanking, fare),
            Money::from_rupees(15)
        );
    }

    #[test]
    fn test_card_fee_rounds_to_nearest_rupee() {
        // 2% of 175 is 3.5, rounds up to 4
        assert_eq!(
            convenience_fee(PaymentMode::Card, Money::from_rupees(175)),
            Money::from_rupees(4)
        );
        // 2% of 120 is 2.4, rounds down to 2
        assert_eq!(
            convenience_fee(PaymentMode::Card, Money::from_rupees(120)),
            Money::from_rupees(2)
        );
    }

    #[tokio::test]
    async fn test_always_succeeds_returns_receipt() {
        let gateway = SimulatedGateway::always_succeeds();
        let receipt = gateway
            .charge(Money::from_rupees(765), PaymentMode::Card)
            .await
            .unwrap();
        assert_eq!(receipt.amount, Money::from_rupees(765));
        assert!(receipt.transaction_id.starts_with("TXN"));
    }

    #[tokio::test]
    async fn test_always_fails_declines_with_reason() {
        let gateway = SimulatedGateway::always_fails();
        let error = gateway
            .charge(Money::from_rupees(765), PaymentMode::Upi)
            .await
            .unwrap_err();
        assert_eq!(
            error,
            PaymentGatewayError::Declined {
                reason: SimulatedGateway::DECLINE_REASON.to_string(),
            }
        );
        assert_eq!(error.to_string(), SimulatedGateway::DECLINE_REASON);
    }
}
