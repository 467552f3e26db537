//! Cart operations

use crate::cart::model::{CartLine, CartLineView};
use crate::cart::store::{CartStore, MAX_LINE_QUANTITY};
use crate::catalog::model::Product;
use crate::catalog::service::CatalogService;
use crate::core::Entity;
use crate::core::error::{ShopError, ShopResult};
use std::sync::Arc;
use uuid::Uuid;

/// The cart aggregate: one user's lines, keyed by product
#[derive(Clone)]
pub struct CartService {
    store: Arc<dyn CartStore>,
    catalog: CatalogService,
}

impl CartService {
    pub fn new(store: Arc<dyn CartStore>, catalog: CatalogService) -> Self {
        Self { store, catalog }
    }

    /// Add `quantity` units of a product, merging with an existing line
    pub async fn add_item(&self, user_id: &Uuid, product_id: &Uuid, quantity: u32) -> ShopResult<CartLine> {
        if quantity < 1 {
            return Err(ShopError::invalid_input("quantity", "must be at least 1"));
        }
        if !self.catalog.product_exists(product_id).await? {
            return Err(ShopError::not_found(Product::resource_name_singular(), product_id));
        }

        let line = self
            .store
            .add_quantity(user_id, product_id, quantity)
            .await?
            .ok_or_else(|| {
                ShopError::invalid_input(
                    "quantity",
                    format!("line quantity may not exceed {}", MAX_LINE_QUANTITY),
                )
            })?;

        tracing::debug!(
            user_id = %user_id,
            product_id = %product_id,
            added = quantity,
            quantity = line.quantity,
            "Cart line updated"
        );
        Ok(line)
    }

    /// The user's lines joined with current products
    pub async fn get_items(&self, user_id: &Uuid) -> ShopResult<Vec<CartLineView>> {
        let lines = self.store.list_for_user(user_id).await?;
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = lines.iter().map(|line| line.product_id).collect();
        let products = self.catalog.products_by_ids(&ids).await?;

        Ok(lines
            .into_iter()
            .map(|line| {
                let product = products.get(&line.product_id).cloned();
                CartLineView::new(line, product)
            })
            .collect())
    }

    /// Remove one line. Lines owned by someone else are reported as missing
    pub async fn remove_item(&self, user_id: &Uuid, line_id: &Uuid) -> ShopResult<()> {
        if !self.store.remove_for_user(user_id, line_id).await? {
            return Err(ShopError::not_found(CartLine::resource_name_singular(), line_id));
        }
        Ok(())
    }

    /// Remove what a checkout consumed from the cart
    ///
    /// Only the listed lines lose only the quantities that were read, so
    /// units added while the checkout ran stay in the cart.
    pub async fn consume_lines(&self, user_id: &Uuid, consumed: &[CartLineView]) -> ShopResult<u64> {
        let taken: Vec<(Uuid, u32)> = consumed.iter().map(|line| (line.id, line.quantity)).collect();
        let removed = self.store.remove_lines(user_id, &taken).await?;
        tracing::debug!(user_id = %user_id, removed = removed, "Checked-out lines removed");
        Ok(removed)
    }

    /// Remove every line the user owns. Returns the number removed
    pub async fn clear_cart(&self, user_id: &Uuid) -> ShopResult<u64> {
        let removed = self.store.clear(user_id).await?;
        tracing::debug!(user_id = %user_id, removed = removed, "Cart cleared");
        Ok(removed)
    }
}
