use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use orderflow_core::AggregateId;
use orderflow_products::{Product, ProductId};
use orderflow_store::ProductStore;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().nest("/products", products_router())
}

fn products_router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/:id/inventory", put(set_inventory))
}

fn parse_product_id(id: &str) -> Result<ProductId, axum::response::Response> {
    id.parse::<AggregateId>()
        .map(ProductId::new)
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let unit_price = match dto::parse_money(&body.price) {
        Ok(v) => v,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let mut product = match Product::new(
        ProductId::new(AggregateId::new()),
        body.sku,
        body.name,
        unit_price,
        body.stock_quantity.unwrap_or(0),
        Utc::now(),
    ) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    product.description = body.description;

    if let Err(e) = services.products.insert(product.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.products.list() {
        Ok(products) => {
            let items: Vec<_> = products.iter().map(dto::product_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "products": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.get(id) {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let patch = match body.into_patch() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let mut product = match services.products.get(id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = product.apply_patch(patch, Utc::now()) {
        return errors::domain_error_to_response(e);
    }
    if let Err(e) = services.products.update(product.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::OK, Json(dto::product_to_json(&product))).into_response()
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.products.remove(id) {
        Ok(_) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "product deleted"})),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn set_inventory(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetInventoryRequest>,
) -> axum::response::Response {
    let id = match parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let mut product = match services.products.get(id) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    product.set_inventory(body.quantity, Utc::now());
    if let Err(e) = services.products.update(product.clone()) {
        return errors::domain_error_to_response(e);
    }
    (StatusCode::OK, Json(dto::product_to_json(&product))).into_response()
}
