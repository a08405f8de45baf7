use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value};

use orderflow_core::{DomainResult, Money, Patch};
use orderflow_orders::{LineItem, Order, OrderId, Payment};
use orderflow_parties::Customer;
use orderflow_products::{Product, ProductId, ProductPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub company_name: String,
    pub email: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub billing_address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub price: serde_json::Number,
    pub stock_quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub sku: Patch<String>,
    #[serde(default)]
    pub product_name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub unit_price: Patch<serde_json::Number>,
    #[serde(default)]
    pub inventory_quantity: Patch<u32>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> DomainResult<ProductPatch> {
        let unit_price = match self.unit_price {
            Patch::Value(n) => Patch::Value(parse_money(&n)?),
            Patch::Null => Patch::Null,
            Patch::Missing => Patch::Missing,
        };
        Ok(ProductPatch {
            sku: self.sku,
            name: self.product_name,
            description: self.description,
            unit_price,
            inventory_quantity: self.inventory_quantity,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetInventoryRequest {
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderLineRequest {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Option<serde_json::Number>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub line_items: Vec<CreateOrderLineRequest>,
    pub delivery_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FulfillLineRequest {
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub payment_amount: serde_json::Number,
    pub payment_method: Option<String>,
    pub reference_number: Option<String>,
}

/// Parse a JSON number as an exact decimal amount (at most two fraction
/// digits); goes through the number's decimal rendering, never through float
/// arithmetic.
pub fn parse_money(value: &serde_json::Number) -> DomainResult<Money> {
    value.to_string().parse()
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn money_to_json(amount: Money) -> Value {
    match serde_json::Number::from_f64(amount.as_f64()) {
        Some(n) => Value::Number(n),
        None => Value::String(amount.to_string()),
    }
}

pub fn customer_to_json(customer: &Customer) -> Value {
    json!({
        "id": customer.id.to_string(),
        "company_name": customer.company_name,
        "contact_person": customer.contact_person,
        "email": customer.email,
        "phone": customer.phone,
        "billing_address": customer.billing_address,
        "created_at": customer.created_at.to_rfc3339(),
        "updated_at": customer.updated_at.to_rfc3339(),
    })
}

pub fn product_to_json(product: &Product) -> Value {
    json!({
        "id": product.id.to_string(),
        "sku": product.sku,
        "product_name": product.name,
        "description": product.description,
        "unit_price": money_to_json(product.unit_price),
        "inventory_quantity": product.inventory_quantity,
        "created_at": product.created_at.to_rfc3339(),
        "updated_at": product.updated_at.to_rfc3339(),
    })
}

pub fn line_item_to_json(order_id: OrderId, line: &LineItem, product: Option<&Product>) -> Value {
    json!({
        "id": line.id.to_string(),
        "order_id": order_id.to_string(),
        "product_id": line.product_id.to_string(),
        "product": product.map(product_to_json),
        "quantity": line.quantity,
        "unit_price": money_to_json(line.unit_price),
        "line_total": money_to_json(line.line_total),
        "fulfillment_status": line.fulfillment_status.as_str(),
        "fulfilled_quantity": line.fulfilled_quantity,
    })
}

pub fn payment_to_json(order_id: OrderId, payment: &Payment) -> Value {
    json!({
        "id": payment.id.to_string(),
        "order_id": order_id.to_string(),
        "payment_amount": money_to_json(payment.payment_amount),
        "payment_date": payment.payment_date.to_rfc3339(),
        "payment_method": payment.payment_method,
        "reference_number": payment.reference_number,
        "created_at": payment.created_at.to_rfc3339(),
    })
}

pub fn order_to_json(
    order: &Order,
    customer: Option<&Customer>,
    products: &HashMap<ProductId, Product>,
) -> Value {
    json!({
        "id": order.id().to_string(),
        "order_number": order.order_number(),
        "customer_id": order.customer_id().to_string(),
        "customer": customer.map(customer_to_json),
        "order_date": order.order_date().to_rfc3339(),
        "status": order.status().as_str(),
        "payment_status": order.payment_status().as_str(),
        "total_amount": money_to_json(order.total_amount()),
        "delivery_address": order.delivery_address(),
        "line_items": order
            .line_items()
            .iter()
            .map(|line| line_item_to_json(order.id(), line, products.get(&line.product_id)))
            .collect::<Vec<_>>(),
        "payments": order
            .payments()
            .iter()
            .map(|p| payment_to_json(order.id(), p))
            .collect::<Vec<_>>(),
        "created_at": order.created_at().to_rfc3339(),
        "updated_at": order.updated_at().to_rfc3339(),
    })
}
