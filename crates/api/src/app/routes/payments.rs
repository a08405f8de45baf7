use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use orderflow_core::AggregateId;
use orderflow_orders::PaymentId;

use crate::app::routes::orders::parse_order_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Standalone payment resources; the order-scoped record/list routes are
/// mounted inside the orders router.
pub fn router() -> Router {
    Router::new().route("/payments/:id", get(get_payment).delete(delete_payment))
}

fn parse_payment_id(id: &str) -> Result<PaymentId, axum::response::Response> {
    id.parse::<AggregateId>()
        .map(PaymentId::new)
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid payment id"))
}

pub async fn record_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RecordPaymentRequest>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let amount = match dto::parse_money(&body.payment_amount) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .engine
        .record_payment(id, amount, body.payment_method, body.reference_number)
    {
        Ok((order, payment)) => (
            StatusCode::CREATED,
            Json(dto::payment_to_json(order.id(), &payment)),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_payments(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.list_payments(id) {
        Ok(payments) => {
            let items: Vec<_> = payments
                .iter()
                .map(|p| dto::payment_to_json(id, p))
                .collect();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_payment_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let order = match services.engine.order_for_payment(id) {
        Ok(o) => o,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match order.payment(id) {
        Some(payment) => {
            (StatusCode::OK, Json(dto::payment_to_json(order.id(), payment))).into_response()
        }
        None => errors::domain_error_to_response(orderflow_core::DomainError::not_found(
            "payment", id,
        )),
    }
}

pub async fn delete_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_payment_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.delete_payment(id) {
        Ok(order) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "message": "payment deleted",
                "payment_status": order.payment_status().as_str(),
            })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
