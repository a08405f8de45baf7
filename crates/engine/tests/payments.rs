//! Payment ledger scenarios: reconciliation tiers, overpayment, policy.

use std::sync::Arc;

use chrono::Utc;

use orderflow_core::{AggregateId, DomainError, Money};
use orderflow_engine::{EnginePolicy, NewOrder, NewOrderLine, OrderService};
use orderflow_orders::{OrderId, PaymentStatus};
use orderflow_parties::{Customer, CustomerId};
use orderflow_products::{Product, ProductId};
use orderflow_store::{
    CustomerStore, InMemoryCustomerStore, InMemoryOrderStore, InMemoryProductStore, ProductStore,
};

type Service = OrderService<
    Arc<InMemoryCustomerStore>,
    Arc<InMemoryProductStore>,
    Arc<InMemoryOrderStore>,
>;

/// An order totaling 100.00 with plenty of stock behind it.
fn service_with_order(policy: EnginePolicy) -> (Service, OrderId) {
    let customers = Arc::new(InMemoryCustomerStore::new());
    let products = Arc::new(InMemoryProductStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());

    let customer = Customer::new(
        CustomerId::new(AggregateId::new()),
        "Acme Fabrication",
        "orders@acme.test",
        Utc::now(),
    )
    .unwrap();
    let customer_id = customer.id;
    customers.insert(customer).unwrap();

    let product = Product::new(
        ProductId::new(AggregateId::new()),
        "SKU-PAY",
        "Widget",
        Money::from_cents(10_000),
        100,
        Utc::now(),
    )
    .unwrap();
    let product_id = product.id;
    products.insert(product).unwrap();

    let service = OrderService::new(customers, products, orders, policy);
    let order = service
        .create_order(NewOrder {
            customer_id,
            lines: vec![NewOrderLine {
                product_id,
                quantity: 1,
                unit_price: None,
            }],
            delivery_address: None,
        })
        .unwrap();
    let order_id = order.id();
    (service, order_id)
}

fn pay(service: &Service, order_id: OrderId, cents: i64) -> Result<PaymentStatus, DomainError> {
    service
        .record_payment(order_id, Money::from_cents(cents), None, None)
        .map(|(order, _)| order.payment_status())
}

#[test]
fn partial_then_overpayment_scenario() {
    let (service, order_id) = service_with_order(EnginePolicy::default());

    assert_eq!(pay(&service, order_id, 6_000).unwrap(), PaymentStatus::Partial);

    let err = pay(&service, order_id, 4_100).unwrap_err();
    assert_eq!(
        err,
        DomainError::PaymentExceedsTotal {
            total: Money::from_cents(10_000),
            attempted: Money::from_cents(10_100),
        }
    );

    // The failed call appended nothing.
    let payments = service.list_payments(order_id).unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(
        service.get_order(order_id).unwrap().payment_status(),
        PaymentStatus::Partial
    );

    assert_eq!(pay(&service, order_id, 4_000).unwrap(), PaymentStatus::Paid);
}

#[test]
fn non_positive_amounts_are_rejected() {
    let (service, order_id) = service_with_order(EnginePolicy::default());
    for cents in [0, -500] {
        assert!(matches!(
            pay(&service, order_id, cents),
            Err(DomainError::InvalidAmount(_))
        ));
    }
}

#[test]
fn payments_keep_creation_order_and_metadata() {
    let (service, order_id) = service_with_order(EnginePolicy::default());
    service
        .record_payment(
            order_id,
            Money::from_cents(2_500),
            Some("wire".to_string()),
            Some("REF-1".to_string()),
        )
        .unwrap();
    service
        .record_payment(order_id, Money::from_cents(2_500), Some("card".to_string()), None)
        .unwrap();

    let payments = service.list_payments(order_id).unwrap();
    assert_eq!(payments.len(), 2);
    assert_eq!(payments[0].payment_method.as_deref(), Some("wire"));
    assert_eq!(payments[0].reference_number.as_deref(), Some("REF-1"));
    assert_eq!(payments[1].payment_method.as_deref(), Some("card"));
}

#[test]
fn delete_payment_recomputes_status() {
    let (service, order_id) = service_with_order(EnginePolicy::default());
    let (_, first) = service
        .record_payment(order_id, Money::from_cents(6_000), None, None)
        .unwrap();
    pay(&service, order_id, 4_000).unwrap();

    let after = service.delete_payment(first.id).unwrap();
    assert_eq!(after.payment_status(), PaymentStatus::Partial);
    assert_eq!(after.total_paid(), Money::from_cents(4_000));

    // Unknown payment id.
    assert!(matches!(
        service.delete_payment(orderflow_orders::PaymentId::new(AggregateId::new())),
        Err(DomainError::NotFound { entity: "payment", .. })
    ));
}

#[test]
fn get_payment_resolves_through_owning_order() {
    let (service, order_id) = service_with_order(EnginePolicy::default());
    let (_, created) = service
        .record_payment(order_id, Money::from_cents(1_000), None, None)
        .unwrap();

    let fetched = service.get_payment(created.id).unwrap();
    assert_eq!(fetched, created);
}

#[test]
fn voided_orders_accept_payments_by_default() {
    let (service, order_id) = service_with_order(EnginePolicy::default());
    service.void(order_id).unwrap();

    assert_eq!(pay(&service, order_id, 10_000).unwrap(), PaymentStatus::Paid);
}

#[test]
fn strict_policy_rejects_payments_on_voided_orders() {
    let (service, order_id) = service_with_order(EnginePolicy {
        allow_payments_on_voided: false,
    });
    service.void(order_id).unwrap();

    assert!(matches!(
        pay(&service, order_id, 1_000),
        Err(DomainError::InvalidTransition(_))
    ));

    // Complete orders still accept payments under the strict policy.
    let (service, order_id) = service_with_order(EnginePolicy {
        allow_payments_on_voided: false,
    });
    service.issue(order_id).unwrap();
    service.complete(order_id).unwrap();
    assert_eq!(pay(&service, order_id, 10_000).unwrap(), PaymentStatus::Paid);
}
