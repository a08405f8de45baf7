//! `orderflow-parties` — customer records.

pub mod customer;

pub use customer::{Customer, CustomerId, CustomerPatch};
