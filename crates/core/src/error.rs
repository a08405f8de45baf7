//! Domain error model.

use thiserror::Error;

use crate::money::Money;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// transition guards, reconciliation violations). The engine returns these
/// untouched; the HTTP boundary decides status codes and formatting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, empty required field).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A status guard rejected the requested lifecycle operation.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// A product with the given SKU already exists.
    #[error("product with SKU '{0}' already exists")]
    DuplicateSku(String),

    /// A reservation could not be backed by available inventory.
    #[error(
        "insufficient inventory for product {product_id}: available {available}, required {required}"
    )]
    InsufficientInventory {
        product_id: String,
        available: u32,
        required: u32,
    },

    /// Fulfillment quantity exceeds what is left on the line.
    #[error("cannot fulfill {requested} units, only {remaining} remaining")]
    OverFulfillment { remaining: u32, requested: u32 },

    /// A payment amount that is not strictly positive (or not parseable).
    #[error("invalid payment amount: {0}")]
    InvalidAmount(Money),

    /// Recording the payment would push the paid sum past the order total.
    #[error("payment exceeds order total: {attempted} > {total}")]
    PaymentExceedsTotal { total: Money, attempted: Money },

    /// An optimistic concurrency check failed; the caller may retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The storage layer failed in a way the domain cannot interpret.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
