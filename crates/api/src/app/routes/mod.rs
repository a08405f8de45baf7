use axum::Router;

pub mod customers;
pub mod orders;
pub mod payments;
pub mod products;
pub mod system;

/// All domain routes (health is mounted separately in `build_app`).
pub fn router() -> Router {
    Router::new()
        .merge(customers::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(payments::router())
}
