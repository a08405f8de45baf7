use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{AggregateId, DomainError, DomainResult, Entity, Money, Patch};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A catalog entry with a finite inventory count.
///
/// `inventory_quantity` is unsigned, so the "never negative" invariant holds
/// by construction; the store layer is responsible for making reservation
/// batches atomic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Money,
    pub inventory_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        inventory_quantity: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let sku = sku.into();
        let name = name.into();
        if sku.trim().is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if unit_price.is_negative() {
            return Err(DomainError::validation("unit_price cannot be negative"));
        }
        Ok(Self {
            id,
            sku,
            name,
            description: None,
            unit_price,
            inventory_quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update; only provided fields change.
    ///
    /// SKU uniqueness is a catalog-wide concern and is enforced by the store.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(sku) = patch.sku.clone().into_value() {
            if sku.trim().is_empty() {
                return Err(DomainError::validation("sku cannot be empty"));
            }
        }
        if let Some(name) = patch.name.clone().into_value() {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(price) = patch.unit_price.clone().into_value() {
            if price.is_negative() {
                return Err(DomainError::validation("unit_price cannot be negative"));
            }
        }

        patch.sku.apply_to_required(&mut self.sku);
        patch.name.apply_to_required(&mut self.name);
        patch.description.apply_to(&mut self.description);
        patch.unit_price.apply_to_required(&mut self.unit_price);
        patch
            .inventory_quantity
            .apply_to_required(&mut self.inventory_quantity);
        self.updated_at = now;
        Ok(())
    }

    /// Set the absolute inventory count (direct catalog edit).
    pub fn set_inventory(&mut self, quantity: u32, now: DateTime<Utc>) {
        self.inventory_quantity = quantity;
        self.updated_at = now;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update for a product; built by the boundary layer.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub sku: Patch<String>,
    pub name: Patch<String>,
    pub description: Patch<String>,
    pub unit_price: Patch<Money>,
    pub inventory_quantity: Patch<u32>,
}
