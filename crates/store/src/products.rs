use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use orderflow_core::{DomainError, DomainResult};
use orderflow_products::{Product, ProductId};

/// Product catalog, keyed by id, with SKU uniqueness and atomic batch
/// inventory adjustment.
pub trait ProductStore: Send + Sync {
    fn insert(&self, product: Product) -> DomainResult<()>;
    fn get(&self, id: ProductId) -> DomainResult<Product>;
    /// All products, oldest first.
    fn list(&self) -> DomainResult<Vec<Product>>;
    fn update(&self, product: Product) -> DomainResult<()>;
    fn remove(&self, id: ProductId) -> DomainResult<Product>;

    /// Decrement availability for every demand, all-or-nothing.
    ///
    /// Every demand is checked against the projected remaining count before
    /// anything is decremented, so a failing batch mutates nothing — and a
    /// batch naming one product twice cannot oversubscribe it. Unknown
    /// products fail the batch.
    fn reserve(&self, demands: &[(ProductId, u32)]) -> DomainResult<()>;

    /// Return previously reserved quantities.
    ///
    /// Restoration is best-effort: products removed from the catalog since
    /// the reservation are skipped.
    fn release(&self, returns: &[(ProductId, u32)]) -> DomainResult<()>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: Product) -> DomainResult<()> {
        (**self).insert(product)
    }

    fn get(&self, id: ProductId) -> DomainResult<Product> {
        (**self).get(id)
    }

    fn list(&self) -> DomainResult<Vec<Product>> {
        (**self).list()
    }

    fn update(&self, product: Product) -> DomainResult<()> {
        (**self).update(product)
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        (**self).remove(id)
    }

    fn reserve(&self, demands: &[(ProductId, u32)]) -> DomainResult<()> {
        (**self).reserve(demands)
    }

    fn release(&self, returns: &[(ProductId, u32)]) -> DomainResult<()> {
        (**self).release(returns)
    }
}

/// In-memory product store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    records: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sku_taken(records: &HashMap<ProductId, Product>, sku: &str, except: ProductId) -> bool {
        records.values().any(|p| p.sku == sku && p.id != except)
    }
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: Product) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        if records.contains_key(&product.id) {
            return Err(DomainError::conflict("product already exists"));
        }
        if Self::sku_taken(&records, &product.sku, product.id) {
            return Err(DomainError::DuplicateSku(product.sku));
        }
        records.insert(product.id, product);
        Ok(())
    }

    fn get(&self, id: ProductId) -> DomainResult<Product> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        records
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    fn list(&self) -> DomainResult<Vec<Product>> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        let mut products: Vec<Product> = records.values().cloned().collect();
        products.sort_by_key(|p| (p.created_at, p.id.0));
        Ok(products)
    }

    fn update(&self, product: Product) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        if !records.contains_key(&product.id) {
            return Err(DomainError::not_found("product", product.id));
        }
        if Self::sku_taken(&records, &product.sku, product.id) {
            return Err(DomainError::DuplicateSku(product.sku));
        }
        records.insert(product.id, product);
        Ok(())
    }

    fn remove(&self, id: ProductId) -> DomainResult<Product> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        records
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("product", id))
    }

    fn reserve(&self, demands: &[(ProductId, u32)]) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;

        // Check everything against projected counts before mutating anything.
        let mut projected: HashMap<ProductId, u32> = HashMap::new();
        for (product_id, required) in demands {
            let product = records
                .get(product_id)
                .ok_or_else(|| DomainError::not_found("product", product_id))?;
            let available = *projected
                .get(product_id)
                .unwrap_or(&product.inventory_quantity);
            if available < *required {
                return Err(DomainError::InsufficientInventory {
                    product_id: product_id.to_string(),
                    available,
                    required: *required,
                });
            }
            projected.insert(*product_id, available - required);
        }

        for (product_id, remaining) in projected {
            if let Some(product) = records.get_mut(&product_id) {
                product.inventory_quantity = remaining;
            }
        }
        Ok(())
    }

    fn release(&self, returns: &[(ProductId, u32)]) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        for (product_id, quantity) in returns {
            if let Some(product) = records.get_mut(product_id) {
                product.inventory_quantity = product.inventory_quantity.saturating_add(*quantity);
            }
        }
        Ok(())
    }
}
