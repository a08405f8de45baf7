use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{AggregateId, DomainError, DomainResult, Entity, Money, Patch};
use orderflow_parties::CustomerId;
use orderflow_products::ProductId;

use crate::line_item::{LineItem, LineItemId};
use crate::payment::{Payment, PaymentId};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order status lifecycle.
///
/// Forward-only, except for the `Voided` escape: `Unissued → Issued →
/// Complete`, with `Unissued`/`Issued → Voided`. `Complete` and `Voided`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Unissued,
    Issued,
    Complete,
    Voided,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Unissued => "unissued",
            OrderStatus::Issued => "issued",
            OrderStatus::Complete => "complete",
            OrderStatus::Voided => "voided",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unissued" => Some(OrderStatus::Unissued),
            "issued" => Some(OrderStatus::Issued),
            "complete" => Some(OrderStatus::Complete),
            "voided" => Some(OrderStatus::Voided),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Complete | OrderStatus::Voided)
    }
}

/// Derived payment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// The three-tier reconciliation rule: a pure function of the cumulative
/// paid amount and the order total.
pub fn derive_payment_status(total_paid: Money, total_amount: Money) -> PaymentStatus {
    if total_paid >= total_amount {
        PaymentStatus::Paid
    } else if total_paid.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Unpaid
    }
}

/// Input for one line of a new order; the unit price has already been
/// resolved (caller-supplied or snapshotted from the catalog).
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Partial update for an order; only the delivery address is editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub delivery_address: Patch<String>,
}

/// Aggregate root: Order.
///
/// Owns its line items and payments; fields are private so every mutation
/// passes a status guard and the reconciliation arithmetic stays consistent.
/// `total_amount` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    order_number: String,
    customer_id: CustomerId,
    order_date: DateTime<Utc>,
    status: OrderStatus,
    payment_status: PaymentStatus,
    total_amount: Money,
    delivery_address: Option<String>,
    line_items: Vec<LineItem>,
    payments: Vec<Payment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Order {
    pub fn create(
        id: OrderId,
        order_number: impl Into<String>,
        customer_id: CustomerId,
        lines: Vec<NewLineItem>,
        delivery_address: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("order requires at least one line item"));
        }

        let mut line_items = Vec::with_capacity(lines.len());
        let mut total_amount = Money::ZERO;
        for line in lines {
            let item = LineItem::new(
                LineItemId::new(AggregateId::new()),
                line.product_id,
                line.quantity,
                line.unit_price,
            )?;
            total_amount = total_amount
                .checked_add(item.line_total)
                .ok_or_else(|| DomainError::validation("order total out of range"))?;
            line_items.push(item);
        }

        Ok(Self {
            id,
            order_number: order_number.into(),
            customer_id,
            order_date: now,
            status: OrderStatus::Unissued,
            payment_status: PaymentStatus::Unpaid,
            total_amount,
            delivery_address,
            line_items,
            payments: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn delivery_address(&self) -> Option<&str> {
        self.delivery_address.as_deref()
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn line_item(&self, id: LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|l| l.id == id)
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Store-managed revision counter; see `OrderStore::update`.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    pub fn total_paid(&self) -> Money {
        Money::from_cents(self.payments.iter().map(|p| p.payment_amount.cents()).sum())
    }

    /// Move to `Issued`. Inventory reservation happens alongside, in the
    /// same logical transaction, driven by the engine.
    pub fn issue(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Unissued {
            return Err(DomainError::invalid_transition(format!(
                "order is {}, only unissued orders can be issued",
                self.status.as_str()
            )));
        }
        self.status = OrderStatus::Issued;
        self.updated_at = now;
        Ok(())
    }

    /// Move to `Voided`. Returns whether inventory was reserved and must be
    /// released (true only when the order had been issued).
    pub fn void(&mut self, now: DateTime<Utc>) -> DomainResult<bool> {
        let release_inventory = match self.status {
            OrderStatus::Complete => {
                return Err(DomainError::invalid_transition(
                    "completed orders cannot be voided",
                ));
            }
            OrderStatus::Voided => {
                return Err(DomainError::invalid_transition("order is already voided"));
            }
            OrderStatus::Issued => true,
            OrderStatus::Unissued => false,
        };
        self.status = OrderStatus::Voided;
        self.updated_at = now;
        Ok(release_inventory)
    }

    /// Move to `Complete`, treating every untouched line as shipped in full.
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Issued {
            return Err(DomainError::invalid_transition(
                "order must be issued before completion",
            ));
        }
        for line in &mut self.line_items {
            line.fulfill_if_untouched();
        }
        self.status = OrderStatus::Complete;
        self.updated_at = now;
        Ok(())
    }

    /// Record delivery against one line. `quantity: None` fulfills the
    /// line's full remaining quantity.
    ///
    /// When the last line reaches `Fulfilled`, the order auto-transitions to
    /// `Complete` — a documented side effect, reported via the return value.
    pub fn fulfill_line(
        &mut self,
        line_item_id: LineItemId,
        quantity: Option<u32>,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        if self.status != OrderStatus::Issued {
            return Err(DomainError::invalid_transition(
                "order must be issued before fulfillment",
            ));
        }
        let line = self
            .line_items
            .iter_mut()
            .find(|l| l.id == line_item_id)
            .ok_or_else(|| DomainError::not_found("line item", line_item_id))?;

        let quantity = quantity.unwrap_or_else(|| line.remaining_quantity());
        line.fulfill(quantity)?;

        let auto_completed = self.line_items.iter().all(LineItem::is_fulfilled);
        if auto_completed {
            self.status = OrderStatus::Complete;
        }
        self.updated_at = now;
        Ok(auto_completed)
    }

    /// Edit order details; permitted only while unissued.
    pub fn update_details(&mut self, patch: OrderPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status != OrderStatus::Unissued {
            return Err(DomainError::invalid_transition(
                "only unissued orders can be edited",
            ));
        }
        patch.delivery_address.apply_to(&mut self.delivery_address);
        self.updated_at = now;
        Ok(())
    }

    /// Append a payment and recompute `payment_status`.
    ///
    /// The exceeds-total check and the append are one aggregate mutation, so
    /// the store's version check makes them atomic per order.
    pub fn record_payment(
        &mut self,
        id: PaymentId,
        amount: Money,
        payment_method: Option<String>,
        reference_number: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<&Payment> {
        let payment = Payment::new(id, amount, payment_method, reference_number, now)?;

        let attempted = self
            .total_paid()
            .checked_add(amount)
            .ok_or_else(|| DomainError::validation("paid total out of range"))?;
        if attempted > self.total_amount {
            return Err(DomainError::PaymentExceedsTotal {
                total: self.total_amount,
                attempted,
            });
        }

        let idx = self.payments.len();
        self.payments.push(payment);
        self.payment_status = derive_payment_status(attempted, self.total_amount);
        self.updated_at = now;
        Ok(&self.payments[idx])
    }

    /// Remove a payment (compensating action) and recompute `payment_status`
    /// from the remainder.
    pub fn delete_payment(
        &mut self,
        payment_id: PaymentId,
        now: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        let idx = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or_else(|| DomainError::not_found("payment", payment_id))?;
        let removed = self.payments.remove(idx);
        self.payment_status = derive_payment_status(self.total_paid(), self.total_amount);
        self.updated_at = now;
        Ok(removed)
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_order_number;

    fn test_customer_id() -> CustomerId {
        CustomerId::new(AggregateId::new())
    }

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    fn line(quantity: u32, cents: i64) -> NewLineItem {
        NewLineItem {
            product_id: test_product_id(),
            quantity,
            unit_price: Money::from_cents(cents),
        }
    }

    fn order_with_lines(lines: Vec<NewLineItem>) -> Order {
        let now = Utc::now();
        Order::create(
            OrderId::new(AggregateId::new()),
            generate_order_number(now),
            test_customer_id(),
            lines,
            None,
            now,
        )
        .unwrap()
    }

    fn issued_order(lines: Vec<NewLineItem>) -> Order {
        let mut order = order_with_lines(lines);
        order.issue(Utc::now()).unwrap();
        order
    }

    fn record(order: &mut Order, cents: i64) -> DomainResult<PaymentId> {
        order
            .record_payment(
                PaymentId::new(AggregateId::new()),
                Money::from_cents(cents),
                None,
                None,
                Utc::now(),
            )
            .map(|p| p.id)
    }

    #[test]
    fn create_computes_exact_total() {
        // 2 x 10.00 + 1 x 5.00 = 25.00, no drift.
        let order = order_with_lines(vec![line(2, 1000), line(1, 500)]);
        assert_eq!(order.total_amount(), Money::from_cents(2500));
        assert_eq!(order.total_amount().to_string(), "25.00");
        assert_eq!(order.status(), OrderStatus::Unissued);
        assert_eq!(order.payment_status(), PaymentStatus::Unpaid);
    }

    #[test]
    fn create_rejects_empty_line_set() {
        let err = Order::create(
            OrderId::new(AggregateId::new()),
            "SO-1",
            test_customer_id(),
            vec![],
            None,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn issue_only_from_unissued() {
        let mut order = order_with_lines(vec![line(1, 100)]);
        order.issue(Utc::now()).unwrap();
        assert_eq!(order.status(), OrderStatus::Issued);

        let err = order.issue(Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition(_)));
        assert_eq!(order.status(), OrderStatus::Issued);
    }

    #[test]
    fn void_reports_whether_inventory_was_reserved() {
        let mut unissued = order_with_lines(vec![line(1, 100)]);
        assert!(!unissued.void(Utc::now()).unwrap());

        let mut issued = issued_order(vec![line(1, 100)]);
        assert!(issued.void(Utc::now()).unwrap());
    }

    #[test]
    fn void_rejects_terminal_orders() {
        let mut completed = issued_order(vec![line(1, 100)]);
        completed.complete(Utc::now()).unwrap();
        assert!(matches!(
            completed.void(Utc::now()),
            Err(DomainError::InvalidTransition(_))
        ));
        assert_eq!(completed.status(), OrderStatus::Complete);

        let mut voided = order_with_lines(vec![line(1, 100)]);
        voided.void(Utc::now()).unwrap();
        assert!(matches!(
            voided.void(Utc::now()),
            Err(DomainError::InvalidTransition(_))
        ));
    }

    #[test]
    fn complete_only_from_issued() {
        let mut order = order_with_lines(vec![line(1, 100)]);
        let before = order.clone();
        assert!(matches!(
            order.complete(Utc::now()),
            Err(DomainError::InvalidTransition(_))
        ));
        // Failed transition leaves every field unchanged.
        assert_eq!(order, before);

        let mut voided = order_with_lines(vec![line(1, 100)]);
        voided.void(Utc::now()).unwrap();
        assert!(voided.complete(Utc::now()).is_err());
    }

    #[test]
    fn complete_bulk_fulfills_untouched_lines_only() {
        let mut order = issued_order(vec![line(3, 100), line(2, 100)]);
        let first = order.line_items()[0].id;
        order.fulfill_line(first, Some(1), Utc::now()).unwrap();

        order.complete(Utc::now()).unwrap();
        assert_eq!(order.status(), OrderStatus::Complete);

        // The touched line keeps its actual delivered count.
        assert_eq!(order.line_items()[0].fulfilled_quantity, 1);
        assert_eq!(order.line_items()[1].fulfilled_quantity, 2);
        assert!(order.line_items()[1].is_fulfilled());
    }

    #[test]
    fn fulfill_line_requires_issued_order() {
        let mut order = order_with_lines(vec![line(3, 100)]);
        let id = order.line_items()[0].id;
        assert!(matches!(
            order.fulfill_line(id, Some(1), Utc::now()),
            Err(DomainError::InvalidTransition(_))
        ));
    }

    #[test]
    fn fulfill_line_auto_completes_when_all_lines_fulfilled() {
        let mut order = issued_order(vec![line(3, 100), line(2, 100)]);
        let (a, b) = (order.line_items()[0].id, order.line_items()[1].id);

        let auto = order.fulfill_line(a, Some(3), Utc::now()).unwrap();
        assert!(!auto);
        assert_eq!(order.status(), OrderStatus::Issued);

        let auto = order.fulfill_line(b, Some(2), Utc::now()).unwrap();
        assert!(auto);
        assert_eq!(order.status(), OrderStatus::Complete);
    }

    #[test]
    fn fulfill_line_defaults_to_remaining_quantity() {
        let mut order = issued_order(vec![line(5, 100)]);
        let id = order.line_items()[0].id;
        order.fulfill_line(id, Some(2), Utc::now()).unwrap();

        let auto = order.fulfill_line(id, None, Utc::now()).unwrap();
        assert!(auto);
        assert_eq!(order.line_items()[0].fulfilled_quantity, 5);
    }

    #[test]
    fn fulfill_line_unknown_id_is_not_found() {
        let mut order = issued_order(vec![line(1, 100)]);
        let err = order
            .fulfill_line(LineItemId::new(AggregateId::new()), Some(1), Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "line item", .. }));
    }

    #[test]
    fn update_details_only_while_unissued() {
        let mut order = order_with_lines(vec![line(1, 100)]);
        let patch = OrderPatch {
            delivery_address: Patch::Value("12 Dock Rd".to_string()),
        };
        order.update_details(patch, Utc::now()).unwrap();
        assert_eq!(order.delivery_address(), Some("12 Dock Rd"));

        order.issue(Utc::now()).unwrap();
        let patch = OrderPatch {
            delivery_address: Patch::Value("elsewhere".to_string()),
        };
        assert!(matches!(
            order.update_details(patch, Utc::now()),
            Err(DomainError::InvalidTransition(_))
        ));
        assert_eq!(order.delivery_address(), Some("12 Dock Rd"));
    }

    #[test]
    fn payments_walk_the_three_tiers() {
        // Total 100.00.
        let mut order = order_with_lines(vec![line(1, 10_000)]);

        record(&mut order, 6_000).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Partial);

        record(&mut order, 4_000).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Paid);
        assert_eq!(order.total_paid(), Money::from_cents(10_000));
    }

    #[test]
    fn overpayment_is_rejected_atomically() {
        let mut order = order_with_lines(vec![line(1, 10_000)]);
        record(&mut order, 6_000).unwrap();

        let err = record(&mut order, 4_100).unwrap_err();
        assert_eq!(
            err,
            DomainError::PaymentExceedsTotal {
                total: Money::from_cents(10_000),
                attempted: Money::from_cents(10_100),
            }
        );
        assert_eq!(order.payments().len(), 1);
        assert_eq!(order.payment_status(), PaymentStatus::Partial);
    }

    #[test]
    fn payments_accepted_on_complete_orders() {
        let mut order = issued_order(vec![line(1, 10_000)]);
        order.complete(Utc::now()).unwrap();
        record(&mut order, 10_000).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Paid);
    }

    #[test]
    fn delete_payment_recomputes_status() {
        let mut order = order_with_lines(vec![line(1, 10_000)]);
        let first = record(&mut order, 6_000).unwrap();
        record(&mut order, 4_000).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Paid);

        order.delete_payment(first, Utc::now()).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Partial);
        assert_eq!(order.total_paid(), Money::from_cents(4_000));

        let remaining = order.payments()[0].id;
        order.delete_payment(remaining, Utc::now()).unwrap();
        assert_eq!(order.payment_status(), PaymentStatus::Unpaid);
    }

    #[test]
    fn delete_unknown_payment_is_not_found() {
        let mut order = order_with_lines(vec![line(1, 100)]);
        assert!(matches!(
            order.delete_payment(PaymentId::new(AggregateId::new()), Utc::now()),
            Err(DomainError::NotFound { entity: "payment", .. })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The three-tier rule, exhaustively.
            #[test]
            fn payment_status_matches_tiers(paid in 0i64..1_000_000, total in 1i64..1_000_000) {
                let status = derive_payment_status(
                    Money::from_cents(paid),
                    Money::from_cents(total),
                );
                let expected = if paid >= total {
                    PaymentStatus::Paid
                } else if paid > 0 {
                    PaymentStatus::Partial
                } else {
                    PaymentStatus::Unpaid
                };
                prop_assert_eq!(status, expected);
            }

            /// Recording any sequence of payments never pushes the paid sum
            /// past the total, and the derived status always matches the sum.
            #[test]
            fn paid_sum_never_exceeds_total(
                total in 1i64..100_000,
                amounts in proptest::collection::vec(1i64..50_000, 0..12),
            ) {
                let mut order = order_with_lines(vec![line(1, total)]);
                for cents in amounts {
                    let _ = record(&mut order, cents);
                    prop_assert!(order.total_paid() <= order.total_amount());
                    prop_assert_eq!(
                        order.payment_status(),
                        derive_payment_status(order.total_paid(), order.total_amount())
                    );
                }
            }

            /// Fulfillment never exceeds the ordered quantity, whatever the
            /// request sequence.
            #[test]
            fn fulfilled_quantity_stays_bounded(
                quantity in 1u32..50,
                requests in proptest::collection::vec(1u32..20, 1..12),
            ) {
                let mut order = issued_order(vec![line(quantity, 100)]);
                let id = order.line_items()[0].id;
                for req in requests {
                    let _ = order.fulfill_line(id, Some(req), Utc::now());
                    let item = &order.line_items()[0];
                    prop_assert!(item.fulfilled_quantity <= item.quantity);
                }
            }
        }
    }
}
