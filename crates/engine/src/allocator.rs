use orderflow_core::DomainResult;
use orderflow_orders::Order;
use orderflow_products::ProductId;
use orderflow_store::ProductStore;

/// Couples order-status transitions to catalog inventory changes.
///
/// Reservation is delegated to the product store's atomic batch operation,
/// so the check-and-decrement across all of an order's lines is
/// all-or-nothing. The lifecycle guards (plus the order store's version
/// check) guarantee each transition invokes the allocator at most once.
#[derive(Debug)]
pub struct InventoryAllocator<P> {
    products: P,
}

impl<P: ProductStore> InventoryAllocator<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    fn demands(order: &Order) -> Vec<(ProductId, u32)> {
        order
            .line_items()
            .iter()
            .map(|line| (line.product_id, line.quantity))
            .collect()
    }

    /// Reserve every line's quantity against the catalog.
    #[tracing::instrument(skip_all, fields(order_id = %order.id()))]
    pub fn reserve(&self, order: &Order) -> DomainResult<()> {
        self.products.reserve(&Self::demands(order))
    }

    /// Return every line's quantity to the catalog (void of an issued order).
    #[tracing::instrument(skip_all, fields(order_id = %order.id()))]
    pub fn release(&self, order: &Order) -> DomainResult<()> {
        self.products.release(&Self::demands(order))
    }
}
