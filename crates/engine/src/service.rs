use chrono::Utc;

use orderflow_core::{AggregateId, DomainError, DomainResult, ExpectedVersion, Money};
use orderflow_orders::{
    generate_order_number, LineItemId, NewLineItem, Order, OrderId, OrderPatch, OrderStatus,
    Payment, PaymentId,
};
use orderflow_parties::CustomerId;
use orderflow_products::ProductId;
use orderflow_store::{CustomerStore, OrderFilter, OrderStore, ProductStore};

use crate::allocator::InventoryAllocator;
use crate::policy::EnginePolicy;

/// One requested line of a new order. A missing unit price means "snapshot
/// the product's current catalog price".
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Option<Money>,
}

/// Input for `OrderService::create_order`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub lines: Vec<NewOrderLine>,
    pub delivery_address: Option<String>,
}

/// The order lifecycle engine.
///
/// Every operation is a single logical transaction: load the aggregate,
/// run the pure domain mutation, persist with `ExpectedVersion::Exact` so a
/// concurrent writer surfaces as a conflict rather than lost state. Failures
/// leave state unchanged; the one cross-store sequence (`issue`) compensates
/// its reservation if the final persist loses the version race.
#[derive(Debug)]
pub struct OrderService<C, P, O> {
    customers: C,
    products: P,
    orders: O,
    allocator: InventoryAllocator<P>,
    policy: EnginePolicy,
}

impl<C, P, O> OrderService<C, P, O>
where
    C: CustomerStore,
    P: ProductStore + Clone,
    O: OrderStore,
{
    pub fn new(customers: C, products: P, orders: O, policy: EnginePolicy) -> Self {
        let allocator = InventoryAllocator::new(products.clone());
        Self {
            customers,
            products,
            orders,
            allocator,
            policy,
        }
    }

    pub fn policy(&self) -> EnginePolicy {
        self.policy
    }

    /// Create an order in `unissued`/`unpaid`, snapshotting unit prices.
    #[tracing::instrument(skip_all, fields(customer_id = %input.customer_id))]
    pub fn create_order(&self, input: NewOrder) -> DomainResult<Order> {
        let now = Utc::now();
        self.customers.get(input.customer_id)?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            let product = self.products.get(line.product_id)?;
            lines.push(NewLineItem {
                product_id: product.id,
                quantity: line.quantity,
                unit_price: line.unit_price.unwrap_or(product.unit_price),
            });
        }

        let order = Order::create(
            OrderId::new(AggregateId::new()),
            generate_order_number(now),
            input.customer_id,
            lines,
            input.delivery_address,
            now,
        )?;
        let stored = self.orders.insert(order)?;
        tracing::info!(order_id = %stored.id(), order_number = stored.order_number(), "order created");
        Ok(stored)
    }

    pub fn get_order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.orders.get(order_id)
    }

    pub fn list_orders(&self, filter: &OrderFilter) -> DomainResult<Vec<Order>> {
        self.orders.list(filter)
    }

    /// Edit order details (delivery address); unissued orders only.
    #[tracing::instrument(skip(self, patch), fields(order_id = %order_id))]
    pub fn update_order(&self, order_id: OrderId, patch: OrderPatch) -> DomainResult<Order> {
        let mut order = self.orders.get(order_id)?;
        let expected = ExpectedVersion::Exact(order.version());
        order.update_details(patch, Utc::now())?;
        self.orders.update(order, expected)
    }

    /// `unissued → issued`, reserving inventory in the same transaction.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub fn issue(&self, order_id: OrderId) -> DomainResult<Order> {
        let mut order = self.orders.get(order_id)?;
        let expected = ExpectedVersion::Exact(order.version());
        order.issue(Utc::now())?;

        self.allocator.reserve(&order)?;
        let reserved = order.clone();
        match self.orders.update(order, expected) {
            Ok(stored) => {
                tracing::info!(order_id = %stored.id(), "order issued");
                Ok(stored)
            }
            Err(err) => {
                // Lost the version race after reserving: give the stock back
                // so the conservation law holds, then surface the conflict.
                if let Err(release_err) = self.allocator.release(&reserved) {
                    tracing::error!(order_id = %order_id, error = %release_err, "failed to release compensating reservation");
                }
                Err(err)
            }
        }
    }

    /// `unissued|issued → voided`, returning reserved stock when needed.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub fn void(&self, order_id: OrderId) -> DomainResult<Order> {
        let mut order = self.orders.get(order_id)?;
        let expected = ExpectedVersion::Exact(order.version());
        let release_inventory = order.void(Utc::now())?;

        let stored = self.orders.update(order, expected)?;
        if release_inventory {
            self.allocator.release(&stored)?;
        }
        tracing::info!(order_id = %stored.id(), released = release_inventory, "order voided");
        Ok(stored)
    }

    /// `issued → complete`, bulk-fulfilling untouched lines.
    #[tracing::instrument(skip(self), fields(order_id = %order_id))]
    pub fn complete(&self, order_id: OrderId) -> DomainResult<Order> {
        let mut order = self.orders.get(order_id)?;
        let expected = ExpectedVersion::Exact(order.version());
        order.complete(Utc::now())?;
        let stored = self.orders.update(order, expected)?;
        tracing::info!(order_id = %stored.id(), "order completed");
        Ok(stored)
    }

    /// Record delivery against one line; auto-completes the order when every
    /// line is fulfilled.
    #[tracing::instrument(skip(self), fields(order_id = %order_id, line_item_id = %line_item_id))]
    pub fn fulfill_line(
        &self,
        order_id: OrderId,
        line_item_id: LineItemId,
        quantity: Option<u32>,
    ) -> DomainResult<Order> {
        let mut order = self.orders.get(order_id)?;
        let expected = ExpectedVersion::Exact(order.version());
        let auto_completed = order.fulfill_line(line_item_id, quantity, Utc::now())?;
        let stored = self.orders.update(order, expected)?;
        if auto_completed {
            tracing::info!(order_id = %stored.id(), "order auto-completed by fulfillment");
        }
        Ok(stored)
    }

    /// Append a payment; the exceeds-total check and the append commit
    /// together or not at all.
    #[tracing::instrument(skip_all, fields(order_id = %order_id))]
    pub fn record_payment(
        &self,
        order_id: OrderId,
        amount: Money,
        payment_method: Option<String>,
        reference_number: Option<String>,
    ) -> DomainResult<(Order, Payment)> {
        let mut order = self.orders.get(order_id)?;
        if order.status() == OrderStatus::Voided && !self.policy.allow_payments_on_voided {
            return Err(DomainError::invalid_transition(
                "payments cannot be recorded against a voided order",
            ));
        }
        let expected = ExpectedVersion::Exact(order.version());
        let payment = order
            .record_payment(
                PaymentId::new(AggregateId::new()),
                amount,
                payment_method,
                reference_number,
                Utc::now(),
            )?
            .clone();
        let stored = self.orders.update(order, expected)?;
        tracing::info!(
            order_id = %stored.id(),
            payment_id = %payment.id,
            payment_status = stored.payment_status().as_str(),
            "payment recorded"
        );
        Ok((stored, payment))
    }

    /// Remove a payment (compensating action) and recompute the order's
    /// payment status.
    #[tracing::instrument(skip(self), fields(payment_id = %payment_id))]
    pub fn delete_payment(&self, payment_id: PaymentId) -> DomainResult<Order> {
        let mut order = self.orders.find_order_by_payment(payment_id)?;
        let expected = ExpectedVersion::Exact(order.version());
        order.delete_payment(payment_id, Utc::now())?;
        self.orders.update(order, expected)
    }

    /// Resolve the order owning a payment (payment resources render with
    /// their owning order id).
    pub fn order_for_payment(&self, payment_id: PaymentId) -> DomainResult<Order> {
        self.orders.find_order_by_payment(payment_id)
    }

    pub fn get_payment(&self, payment_id: PaymentId) -> DomainResult<Payment> {
        let order = self.orders.find_order_by_payment(payment_id)?;
        order
            .payment(payment_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("payment", payment_id))
    }

    /// Payments for an order, in creation order.
    pub fn list_payments(&self, order_id: OrderId) -> DomainResult<Vec<Payment>> {
        Ok(self.orders.get(order_id)?.payments().to_vec())
    }
}
