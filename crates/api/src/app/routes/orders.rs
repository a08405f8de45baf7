use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use orderflow_core::AggregateId;
use orderflow_engine::{NewOrder, NewOrderLine};
use orderflow_orders::{LineItemId, OrderId, OrderPatch, OrderStatus};
use orderflow_parties::CustomerId;
use orderflow_products::ProductId;
use orderflow_store::OrderFilter;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/orders", orders_router())
}

fn orders_router() -> Router {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/:id", get(get_order).put(update_order))
        .route("/:id/issue", post(issue_order))
        .route("/:id/void", post(void_order))
        .route("/:id/complete", post(complete_order))
        .route("/:id/line-items/:line_id/fulfill", post(fulfill_line))
        .route(
            "/:id/payments",
            post(super::payments::record_payment).get(super::payments::list_payments),
        )
}

pub(super) fn parse_order_id(id: &str) -> Result<OrderId, axum::response::Response> {
    id.parse::<AggregateId>()
        .map(OrderId::new)
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> axum::response::Response {
    let customer_id: CustomerId = match body.customer_id.parse::<AggregateId>() {
        Ok(v) => CustomerId::new(v),
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
        }
    };

    let mut lines = Vec::with_capacity(body.line_items.len());
    for item in body.line_items {
        let product_id: ProductId = match item.product_id.parse::<AggregateId>() {
            Ok(v) => ProductId::new(v),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid product id",
                )
            }
        };
        let unit_price = match &item.unit_price {
            Some(n) => match dto::parse_money(n) {
                Ok(v) => Some(v),
                Err(e) => return errors::domain_error_to_response(e),
            },
            None => None,
        };
        lines.push(NewOrderLine {
            product_id,
            quantity: item.quantity,
            unit_price,
        });
    }

    match services.engine.create_order(NewOrder {
        customer_id,
        lines,
        delivery_address: body.delivery_address,
    }) {
        Ok(order) => {
            (StatusCode::CREATED, Json(services.order_resource(&order))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<String>,
    pub customer_id: Option<String>,
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<ListOrdersQuery>,
) -> axum::response::Response {
    let status = match &query.status {
        Some(s) => match OrderStatus::parse(s) {
            Some(v) => Some(v),
            None => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_status",
                    "status must be one of: unissued, issued, complete, voided",
                )
            }
        },
        None => None,
    };
    let customer_id = match &query.customer_id {
        Some(s) => match s.parse::<AggregateId>() {
            Ok(v) => Some(CustomerId::new(v)),
            Err(_) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_id",
                    "invalid customer id",
                )
            }
        },
        None => None,
    };

    match services.engine.list_orders(&OrderFilter { status, customer_id }) {
        Ok(orders) => {
            let items: Vec<_> = orders.iter().map(|o| services.order_resource(o)).collect();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.get_order(id) {
        Ok(order) => (StatusCode::OK, Json(services.order_resource(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<OrderPatch>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.update_order(id, patch) {
        Ok(order) => (StatusCode::OK, Json(services.order_resource(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn issue_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.issue(id) {
        Ok(order) => (StatusCode::OK, Json(services.order_resource(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn void_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.void(id) {
        Ok(order) => (StatusCode::OK, Json(services.order_resource(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn complete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.engine.complete(id) {
        Ok(order) => (StatusCode::OK, Json(services.order_resource(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn fulfill_line(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, line_id)): Path<(String, String)>,
    body: Option<Json<dto::FulfillLineRequest>>,
) -> axum::response::Response {
    let id = match parse_order_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let line_id: LineItemId = match line_id.parse::<AggregateId>() {
        Ok(v) => LineItemId::new(v),
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid line item id")
        }
    };
    let quantity = body.and_then(|Json(b)| b.quantity);

    match services.engine.fulfill_line(id, line_id, quantity) {
        Ok(order) => (StatusCode::OK, Json(services.order_resource(&order))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
