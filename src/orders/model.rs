//! Order documents, status lifecycle and joined views

use crate::catalog::model::Product;
use crate::core::error::ShopError;
use crate::users::UserSummary;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Where an order is in its lifecycle
///
/// Admins may move an order between any two statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ShopError::invalid_input("status", format!("unknown status '{}'", s)))
    }
}

/// A product snapshot taken at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: u32,
    /// Unit price at checkout time, unaffected by later catalog edits
    pub price: Decimal,
}

impl OrderItem {
    /// `price * quantity`, or `None` past the range of `Decimal`
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

crate::define_entity!(
    /// An immutable record of a completed checkout. Only `status` changes
    /// after creation
    Order, "orders", "order",
    {
        user_id: Uuid,
        items: Vec<OrderItem>,
        total: Decimal,
        status: OrderStatus,
        shipping_address: Option<String>,
    }
);

impl Order {
    /// Build a pending order whose total is the exact sum of its lines
    pub fn place(user_id: Uuid, items: Vec<OrderItem>, shipping_address: Option<String>) -> Result<Self, ShopError> {
        let total = Self::total_of(&items)?;
        Ok(Self::new(user_id, items, total, OrderStatus::Pending, shipping_address))
    }

    /// Exact sum of the line totals. Fails with `InvalidInput` when a line
    /// or the sum leaves the range of `Decimal`
    pub fn total_of(items: &[OrderItem]) -> Result<Decimal, ShopError> {
        items
            .iter()
            .try_fold(Decimal::ZERO, |total, item| {
                item.line_total().and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| ShopError::invalid_input("total", "order total exceeds the supported range"))
    }
}

/// An order line joined with the current product document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItemView {
    pub product_id: Uuid,
    pub quantity: u32,
    pub price: Decimal,
    /// `None` when the product has since been deleted
    pub product: Option<Product>,
}

/// An order with its products and, for admin listings, its buyer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItemView>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
}

impl OrderView {
    pub fn assemble(order: Order, products: &HashMap<Uuid, Product>, user: Option<UserSummary>) -> Self {
        let items = order
            .items
            .into_iter()
            .map(|item| OrderItemView {
                product: products.get(&item.product_id).cloned(),
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        Self {
            id: order.id,
            user_id: order.user_id,
            items,
            total: order.total,
            status: order.status,
            shipping_address: order.shipping_address,
            created_at: order.created_at,
            updated_at: order.updated_at,
            user,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
