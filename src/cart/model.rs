//! Cart documents and request payloads

use crate::catalog::model::Product;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

crate::define_entity!(
    /// One product in one user's cart. At most one line exists per
    /// (user, product) pair
    CartLine, "cart_items", "cart_item",
    {
        user_id: Uuid,
        product_id: Uuid,
        quantity: u32,
    }
);

/// A cart line joined with its product
///
/// `product` is `None` when the product has been deleted since it was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: u32,
    pub product: Option<Product>,
}

impl CartLineView {
    pub fn new(line: CartLine, product: Option<Product>) -> Self {
        Self {
            id: line.id,
            product_id: line.product_id,
            quantity: line.quantity,
            product,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
}
