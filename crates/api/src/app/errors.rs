use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use orderflow_core::DomainError;

/// Map an engine/domain failure to a status code + error body.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let (status, code) = match &err {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        DomainError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
        DomainError::InvalidTransition(_) => (StatusCode::BAD_REQUEST, "invalid_transition"),
        DomainError::DuplicateSku(_) => (StatusCode::BAD_REQUEST, "duplicate_sku"),
        DomainError::InsufficientInventory { .. } => {
            (StatusCode::BAD_REQUEST, "insufficient_inventory")
        }
        DomainError::OverFulfillment { .. } => (StatusCode::BAD_REQUEST, "over_fulfillment"),
        DomainError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount"),
        DomainError::PaymentExceedsTotal { .. } => {
            (StatusCode::BAD_REQUEST, "payment_exceeds_total")
        }
        DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
        DomainError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
    };
    json_error(status, code, err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
