use serde::{Deserialize, Serialize};

use orderflow_core::{AggregateId, DomainError, DomainResult, Money};
use orderflow_products::ProductId;

/// Line item identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItemId(pub AggregateId);

impl LineItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LineItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Per-line delivery progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    Unfulfilled,
    PartiallyFulfilled,
    Fulfilled,
}

impl FulfillmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Unfulfilled => "unfulfilled",
            FulfillmentStatus::PartiallyFulfilled => "partially_fulfilled",
            FulfillmentStatus::Fulfilled => "fulfilled",
        }
    }
}

/// One ordered product position.
///
/// `unit_price` is a snapshot taken at order creation; later catalog price
/// changes do not affect existing orders. `fulfilled_quantity` never exceeds
/// `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub fulfillment_status: FulfillmentStatus,
    pub fulfilled_quantity: u32,
}

impl LineItem {
    pub(crate) fn new(
        id: LineItemId,
        product_id: ProductId,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("line item quantity must be positive"));
        }
        if unit_price.is_negative() {
            return Err(DomainError::validation("unit_price cannot be negative"));
        }
        let line_total = unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| DomainError::validation("line total out of range"))?;
        Ok(Self {
            id,
            product_id,
            quantity,
            unit_price,
            line_total,
            fulfillment_status: FulfillmentStatus::Unfulfilled,
            fulfilled_quantity: 0,
        })
    }

    pub fn remaining_quantity(&self) -> u32 {
        self.quantity - self.fulfilled_quantity
    }

    pub fn is_fulfilled(&self) -> bool {
        self.fulfillment_status == FulfillmentStatus::Fulfilled
    }

    /// Record delivery of `quantity` more units.
    pub(crate) fn fulfill(&mut self, quantity: u32) -> DomainResult<()> {
        let remaining = self.remaining_quantity();
        if quantity > remaining {
            return Err(DomainError::OverFulfillment {
                remaining,
                requested: quantity,
            });
        }
        self.fulfilled_quantity += quantity;
        self.fulfillment_status = if self.fulfilled_quantity == self.quantity {
            FulfillmentStatus::Fulfilled
        } else if self.fulfilled_quantity > 0 {
            FulfillmentStatus::PartiallyFulfilled
        } else {
            FulfillmentStatus::Unfulfilled
        };
        Ok(())
    }

    /// Bulk completion: an untouched line is treated as shipped in full.
    /// Partially fulfilled lines are left exactly as they are.
    pub(crate) fn fulfill_if_untouched(&mut self) {
        if self.fulfillment_status == FulfillmentStatus::Unfulfilled {
            self.fulfilled_quantity = self.quantity;
            self.fulfillment_status = FulfillmentStatus::Fulfilled;
        }
    }
}
