use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{AggregateId, DomainError, DomainResult, Money};

/// Payment identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub AggregateId);

impl PaymentId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PaymentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One recorded payment against an order.
///
/// Append-only: there is no mutation API. Removal exists solely as a
/// compensating action and triggers a payment-status recompute on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub payment_amount: Money,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
    pub payment_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub(crate) fn new(
        id: PaymentId,
        payment_amount: Money,
        payment_method: Option<String>,
        reference_number: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if !payment_amount.is_positive() {
            return Err(DomainError::InvalidAmount(payment_amount));
        }
        Ok(Self {
            id,
            payment_amount,
            payment_method,
            reference_number,
            payment_date: now,
            created_at: now,
        })
    }
}
