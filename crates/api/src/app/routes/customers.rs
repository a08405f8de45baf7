use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use orderflow_core::AggregateId;
use orderflow_parties::{Customer, CustomerId, CustomerPatch};
use orderflow_store::CustomerStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/customers", customers_router())
}

fn customers_router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/:id", get(get_customer).put(update_customer).delete(delete_customer))
}

fn parse_customer_id(id: &str) -> Result<CustomerId, axum::response::Response> {
    id.parse::<AggregateId>()
        .map(CustomerId::new)
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id"))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCustomerRequest>,
) -> axum::response::Response {
    let mut customer = match Customer::new(
        CustomerId::new(AggregateId::new()),
        body.company_name,
        body.email,
        Utc::now(),
    ) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    customer.contact_person = body.contact_person;
    customer.phone = body.phone;
    customer.billing_address = body.billing_address;

    if let Err(e) = services.customers.insert(customer.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::CREATED, Json(dto::customer_to_json(&customer))).into_response()
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.customers.list() {
        Ok(customers) => {
            let items: Vec<_> = customers.iter().map(dto::customer_to_json).collect();
            (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_customer_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.customers.get(id) {
        Ok(customer) => (StatusCode::OK, Json(dto::customer_to_json(&customer))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(patch): Json<CustomerPatch>,
) -> axum::response::Response {
    let id = match parse_customer_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let mut customer = match services.customers.get(id) {
        Ok(c) => c,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = customer.apply_patch(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.customers.update(customer.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::OK, Json(dto::customer_to_json(&customer))).into_response()
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_customer_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.customers.remove(id) {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "customer deleted"})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
