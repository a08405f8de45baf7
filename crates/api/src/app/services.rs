use std::collections::HashMap;
use std::sync::Arc;

use orderflow_engine::{EnginePolicy, OrderService};
use orderflow_orders::Order;
use orderflow_products::{Product, ProductId};
use orderflow_store::{
    CustomerStore, InMemoryCustomerStore, InMemoryOrderStore, InMemoryProductStore, ProductStore,
};

use crate::app::dto;

/// The engine, concretized over the in-memory stores.
pub type EngineService = OrderService<
    Arc<InMemoryCustomerStore>,
    Arc<InMemoryProductStore>,
    Arc<InMemoryOrderStore>,
>;

/// Shared handler state: direct store handles for the catalog CRUD surface,
/// the engine for everything with lifecycle semantics.
pub struct AppServices {
    pub customers: Arc<InMemoryCustomerStore>,
    pub products: Arc<InMemoryProductStore>,
    pub engine: EngineService,
}

pub fn build_services(policy: EnginePolicy) -> AppServices {
    let customers = Arc::new(InMemoryCustomerStore::new());
    let products = Arc::new(InMemoryProductStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());

    let engine = OrderService::new(
        Arc::clone(&customers),
        Arc::clone(&products),
        orders,
        policy,
    );

    AppServices {
        customers,
        products,
        engine,
    }
}

impl AppServices {
    /// Render an order resource with its nested customer, products, and
    /// payments. Lookups are best-effort: a record deleted since order
    /// creation renders as `null`, it does not fail the response.
    pub fn order_resource(&self, order: &Order) -> serde_json::Value {
        let customer = self.customers.get(order.customer_id()).ok();
        let mut products: HashMap<ProductId, Product> = HashMap::new();
        for line in order.line_items() {
            if let Ok(product) = self.products.get(line.product_id) {
                products.insert(product.id, product);
            }
        }
        dto::order_to_json(order, customer.as_ref(), &products)
    }
}
