//! `orderflow-products` — product catalog records and the inventory count invariant.

pub mod product;

pub use product::{Product, ProductId, ProductPatch};
