//! Catalog documents and request payloads

use crate::core::validation::{non_negative, not_blank};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

crate::define_entity!(
    /// A product grouping; names are unique after trimming
    Category, "categories", "category",
    {
        name: String,
        description: Option<String>,
    }
);

crate::define_entity!(
    /// A sellable item. `price` is the current list price; orders keep
    /// their own copy at checkout time
    Product, "products", "product",
    {
        name: String,
        description: Option<String>,
        price: Decimal,
        category_id: Uuid,
        /// Informational only, never decremented by checkout
        stock: u32,
        image_url: Option<String>,
    }
);

/// A product joined with its category
///
/// `category` is `None` when the referenced category has been deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    pub category_id: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i64,
    /// Reference to an already uploaded image, resolved by the object store
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(custom(function = "not_blank"))]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}
