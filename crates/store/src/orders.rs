use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use orderflow_core::{DomainError, DomainResult, ExpectedVersion};
use orderflow_orders::{Order, OrderId, OrderStatus, PaymentId};
use orderflow_parties::CustomerId;

/// Optional list filters; both default to "any".
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub customer_id: Option<CustomerId>,
}

impl OrderFilter {
    fn matches(&self, order: &Order) -> bool {
        self.status.is_none_or(|s| order.status() == s)
            && self.customer_id.is_none_or(|c| order.customer_id() == c)
    }
}

/// Order aggregates (order + line items + payments), keyed by id.
///
/// Updates are whole-aggregate swaps guarded by `ExpectedVersion`, which is
/// what makes every engine operation an atomic read-modify-write: a
/// concurrent writer bumps the version and the slower writer's update fails
/// with a conflict instead of clobbering state.
pub trait OrderStore: Send + Sync {
    /// Persist a new order at version 1. Returns the stored aggregate.
    fn insert(&self, order: Order) -> DomainResult<Order>;
    fn get(&self, id: OrderId) -> DomainResult<Order>;
    /// Matching orders, newest first.
    fn list(&self, filter: &OrderFilter) -> DomainResult<Vec<Order>>;
    /// Replace the aggregate if the stored version matches; bumps the
    /// version by one. Returns the stored aggregate.
    fn update(&self, order: Order, expected: ExpectedVersion) -> DomainResult<Order>;
    /// Resolve the order owning the given payment.
    fn find_order_by_payment(&self, payment_id: PaymentId) -> DomainResult<Order>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn insert(&self, order: Order) -> DomainResult<Order> {
        (**self).insert(order)
    }

    fn get(&self, id: OrderId) -> DomainResult<Order> {
        (**self).get(id)
    }

    fn list(&self, filter: &OrderFilter) -> DomainResult<Vec<Order>> {
        (**self).list(filter)
    }

    fn update(&self, order: Order, expected: ExpectedVersion) -> DomainResult<Order> {
        (**self).update(order, expected)
    }

    fn find_order_by_payment(&self, payment_id: PaymentId) -> DomainResult<Order> {
        (**self).find_order_by_payment(payment_id)
    }
}

/// In-memory order store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    records: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, mut order: Order) -> DomainResult<Order> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        if records.contains_key(&order.id()) {
            return Err(DomainError::conflict("order already exists"));
        }
        if records
            .values()
            .any(|o| o.order_number() == order.order_number())
        {
            return Err(DomainError::conflict("order number already exists"));
        }
        order.set_version(1);
        records.insert(order.id(), order.clone());
        Ok(order)
    }

    fn get(&self, id: OrderId) -> DomainResult<Order> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        records
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("order", id))
    }

    fn list(&self, filter: &OrderFilter) -> DomainResult<Vec<Order>> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        let mut orders: Vec<Order> = records
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse((o.created_at(), o.id().0)));
        Ok(orders)
    }

    fn update(&self, mut order: Order, expected: ExpectedVersion) -> DomainResult<Order> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        let stored = records
            .get(&order.id())
            .ok_or_else(|| DomainError::not_found("order", order.id()))?;
        expected.check(stored.version())?;
        order.set_version(stored.version() + 1);
        records.insert(order.id(), order.clone());
        Ok(order)
    }

    fn find_order_by_payment(&self, payment_id: PaymentId) -> DomainResult<Order> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        records
            .values()
            .find(|o| o.payment(payment_id).is_some())
            .cloned()
            .ok_or_else(|| DomainError::not_found("payment", payment_id))
    }
}
