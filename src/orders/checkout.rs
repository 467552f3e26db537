//! Checkout: turn a cart into an order
//!
//! A checkout reads the cart, snapshots every product's current price into
//! the order lines, persists a `PENDING` order and then removes the lines it
//! read. Lines or units added to the cart in the meantime are left in
//! place for a later checkout. The steps run under the user's
//! [`CheckoutGuard`] so two concurrent checkouts cannot both consume the
//! same cart. If the consumed lines cannot be removed after retrying, the
//! order is deleted again so the caller can safely retry the whole
//! checkout.

use crate::cart::model::CartLineView;
use crate::cart::service::CartService;
use crate::catalog::model::Product;
use crate::core::auth::Identity;
use crate::core::error::{ShopError, ShopResult};
use crate::core::retry::{RetryConfig, retry_with_backoff};
use crate::core::service::DataService;
use crate::core::validation::trim_optional;
use crate::core::Entity;
use crate::orders::guard::CheckoutGuard;
use crate::orders::model::{Order, OrderItem, OrderView};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CheckoutService {
    cart: CartService,
    orders: Arc<dyn DataService<Order>>,
    guard: CheckoutGuard,
    retry: RetryConfig,
}

impl CheckoutService {
    pub fn new(cart: CartService, orders: Arc<dyn DataService<Order>>, retry: RetryConfig) -> Self {
        Self {
            cart,
            orders,
            guard: CheckoutGuard::new(),
            retry,
        }
    }

    /// Place an order for everything in the caller's cart
    ///
    /// Fails with `InvalidState` on an empty cart, `NotFound` when a cart
    /// line points at a deleted product and `InvalidInput` when the total
    /// leaves the range of `Decimal`. In each case nothing is written and
    /// the cart is left as it was.
    pub async fn checkout(&self, identity: &Identity, shipping_address: Option<String>) -> ShopResult<OrderView> {
        let user_id = identity.user_id;
        let _permit = self.guard.acquire(user_id).await?;

        let lines = self.cart.get_items(&user_id).await?;
        if lines.is_empty() {
            return Err(ShopError::InvalidState("Cart is empty".to_string()));
        }

        let mut items = Vec::with_capacity(lines.len());
        let mut products: HashMap<Uuid, Product> = HashMap::with_capacity(lines.len());
        for line in &lines {
            let product = line.product.clone().ok_or_else(|| {
                ShopError::not_found(Product::resource_name_singular(), line.product_id)
            })?;
            items.push(OrderItem {
                product_id: product.id,
                quantity: line.quantity,
                price: product.price,
            });
            products.insert(product.id, product);
        }

        let order = Order::place(user_id, items, trim_optional(shipping_address))?;
        let order = self.orders.create(order).await?;

        if let Err(err) = self.consume_cart(&user_id, &lines).await {
            tracing::warn!(
                order_id = %order.id,
                user_id = %user_id,
                error = %err,
                "Cart lines could not be removed, rolling back order"
            );
            if let Err(rollback) = self.orders.delete(&order.id).await {
                tracing::error!(
                    order_id = %order.id,
                    error = %rollback,
                    "Rollback failed, order left without cart cleanup"
                );
            }
            return Err(err);
        }

        tracing::info!(
            order_id = %order.id,
            user_id = %user_id,
            items = order.items.len(),
            total = %order.total,
            "Order placed"
        );
        Ok(OrderView::assemble(order, &products, None))
    }

    async fn consume_cart(&self, user_id: &Uuid, lines: &[CartLineView]) -> ShopResult<u64> {
        let cart = &self.cart;
        retry_with_backoff(&self.retry, move |_attempt| cart.consume_lines(user_id, lines)).await
    }
}
