//! `orderflow-store` — storage contracts and in-memory implementations.
//!
//! The engine assumes a durable store with transactional read-modify-write;
//! these traits are that contract. The in-memory implementations back tests
//! and development: `RwLock`-guarded maps, with the two operations that need
//! real atomicity — batch inventory adjustment and version-checked order
//! updates — performed entirely under one write lock.

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::{CustomerStore, InMemoryCustomerStore};
pub use orders::{InMemoryOrderStore, OrderFilter, OrderStore};
pub use products::{InMemoryProductStore, ProductStore};
