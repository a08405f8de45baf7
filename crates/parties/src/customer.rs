use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{AggregateId, DomainError, DomainResult, Entity, Patch};

/// Customer identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub AggregateId);

impl CustomerId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A buyer the backend tracks orders for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub company_name: String,
    pub contact_person: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub billing_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        company_name: impl Into<String>,
        email: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let company_name = company_name.into();
        let email = email.into();
        if company_name.trim().is_empty() {
            return Err(DomainError::validation("company_name cannot be empty"));
        }
        if email.trim().is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        Ok(Self {
            id,
            company_name,
            contact_person: None,
            email,
            phone: None,
            billing_address: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update; only provided fields change.
    pub fn apply_patch(&mut self, patch: CustomerPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = patch.company_name.clone().into_value() {
            if name.trim().is_empty() {
                return Err(DomainError::validation("company_name cannot be empty"));
            }
        }
        if let Some(email) = patch.email.clone().into_value() {
            if email.trim().is_empty() {
                return Err(DomainError::validation("email cannot be empty"));
            }
        }

        patch.company_name.apply_to_required(&mut self.company_name);
        patch.email.apply_to_required(&mut self.email);
        patch.contact_person.apply_to(&mut self.contact_person);
        patch.phone.apply_to(&mut self.phone);
        patch.billing_address.apply_to(&mut self.billing_address);
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update for a customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    #[serde(default)]
    pub company_name: Patch<String>,
    #[serde(default)]
    pub contact_person: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub phone: Patch<String>,
    #[serde(default)]
    pub billing_address: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_id() -> CustomerId {
        CustomerId::new(AggregateId::new())
    }

    #[test]
    fn new_customer_requires_company_name_and_email() {
        let now = Utc::now();
        assert!(Customer::new(test_id(), "  ", "a@b.com", now).is_err());
        assert!(Customer::new(test_id(), "Acme", "", now).is_err());
        assert!(Customer::new(test_id(), "Acme", "a@b.com", now).is_ok());
    }

    #[test]
    fn patch_updates_only_provided_fields() {
        let now = Utc::now();
        let mut customer = Customer::new(test_id(), "Acme", "a@b.com", now).unwrap();
        customer.phone = Some("111".to_string());

        let patch: CustomerPatch =
            serde_json::from_str(r#"{"contact_person": "Jo", "phone": null}"#).unwrap();
        customer.apply_patch(patch, now).unwrap();

        assert_eq!(customer.company_name, "Acme");
        assert_eq!(customer.contact_person.as_deref(), Some("Jo"));
        assert_eq!(customer.phone, None);
    }

    #[test]
    fn patch_rejects_empty_required_fields() {
        let now = Utc::now();
        let mut customer = Customer::new(test_id(), "Acme", "a@b.com", now).unwrap();

        let patch: CustomerPatch = serde_json::from_str(r#"{"company_name": "  "}"#).unwrap();
        assert!(customer.apply_patch(patch, now).is_err());
        assert_eq!(customer.company_name, "Acme");
    }
}
