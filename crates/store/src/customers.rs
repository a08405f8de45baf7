use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use orderflow_core::{DomainError, DomainResult};
use orderflow_parties::{Customer, CustomerId};

/// Customer records, keyed by id.
pub trait CustomerStore: Send + Sync {
    fn insert(&self, customer: Customer) -> DomainResult<()>;
    fn get(&self, id: CustomerId) -> DomainResult<Customer>;
    /// All customers, oldest first.
    fn list(&self) -> DomainResult<Vec<Customer>>;
    fn update(&self, customer: Customer) -> DomainResult<()>;
    fn remove(&self, id: CustomerId) -> DomainResult<Customer>;
}

impl<S> CustomerStore for Arc<S>
where
    S: CustomerStore + ?Sized,
{
    fn insert(&self, customer: Customer) -> DomainResult<()> {
        (**self).insert(customer)
    }

    fn get(&self, id: CustomerId) -> DomainResult<Customer> {
        (**self).get(id)
    }

    fn list(&self) -> DomainResult<Vec<Customer>> {
        (**self).list()
    }

    fn update(&self, customer: Customer) -> DomainResult<()> {
        (**self).update(customer)
    }

    fn remove(&self, id: CustomerId) -> DomainResult<Customer> {
        (**self).remove(id)
    }
}

/// In-memory customer store. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    records: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn insert(&self, customer: Customer) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        if records.contains_key(&customer.id) {
            return Err(DomainError::conflict("customer already exists"));
        }
        records.insert(customer.id, customer);
        Ok(())
    }

    fn get(&self, id: CustomerId) -> DomainResult<Customer> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        records
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("customer", id))
    }

    fn list(&self) -> DomainResult<Vec<Customer>> {
        let records = self
            .records
            .read()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        let mut customers: Vec<Customer> = records.values().cloned().collect();
        customers.sort_by_key(|c| (c.created_at, c.id.0));
        Ok(customers)
    }

    fn update(&self, customer: Customer) -> DomainResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        if !records.contains_key(&customer.id) {
            return Err(DomainError::not_found("customer", customer.id));
        }
        records.insert(customer.id, customer);
        Ok(())
    }

    fn remove(&self, id: CustomerId) -> DomainResult<Customer> {
        let mut records = self
            .records
            .write()
            .map_err(|_| DomainError::storage("lock poisoned"))?;
        records
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("customer", id))
    }
}
