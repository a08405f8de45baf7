//! `orderflow-orders` — the order aggregate.
//!
//! Everything with a cross-entity invariant lives here: the order status
//! machine, per-line fulfillment tracking, and the payment ledger that
//! derives `payment_status` from recorded payments. Pure domain; inventory
//! side effects and persistence are coordinated by the engine.

pub mod line_item;
pub mod number;
pub mod order;
pub mod payment;

pub use line_item::{FulfillmentStatus, LineItem, LineItemId};
pub use number::generate_order_number;
pub use order::{
    derive_payment_status, NewLineItem, Order, OrderId, OrderPatch, OrderStatus, PaymentStatus,
};
pub use payment::{Payment, PaymentId};
