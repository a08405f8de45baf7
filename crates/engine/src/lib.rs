//! `orderflow-engine` — the order lifecycle engine.
//!
//! Coordinates the pure order aggregate with the catalog and order stores:
//! every operation is one load → mutate → version-checked persist cycle, with
//! inventory reservation/release coupled to the status transitions that
//! require it.

pub mod allocator;
pub mod policy;
pub mod service;

pub use allocator::InventoryAllocator;
pub use policy::EnginePolicy;
pub use service::{NewOrder, NewOrderLine, OrderService};
