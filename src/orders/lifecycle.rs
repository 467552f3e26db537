//! Order queries and status administration

use crate::catalog::service::CatalogService;
use crate::core::auth::{AuthPolicy, Identity, Role, authorize};
use crate::core::error::{ShopError, ShopResult};
use crate::core::service::DataService;
use crate::core::Entity;
use crate::orders::model::{Order, OrderStatus, OrderView};
use crate::users::{UserProfile, UserSummary};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn DataService<Order>>,
    users: Arc<dyn DataService<UserProfile>>,
    catalog: CatalogService,
}

fn newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn DataService<Order>>,
        users: Arc<dyn DataService<UserProfile>>,
        catalog: CatalogService,
    ) -> Self {
        Self {
            orders,
            users,
            catalog,
        }
    }

    async fn with_products(&self, orders: Vec<Order>, users: Option<&HashMap<Uuid, UserProfile>>) -> ShopResult<Vec<OrderView>> {
        let mut product_ids: Vec<Uuid> = orders
            .iter()
            .flat_map(|order| order.items.iter().map(|item| item.product_id))
            .collect();
        product_ids.sort();
        product_ids.dedup();
        let products = self.catalog.products_by_ids(&product_ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let user = users
                    .and_then(|users| users.get(&order.user_id))
                    .map(UserSummary::from);
                OrderView::assemble(order, &products, user)
            })
            .collect())
    }

    /// The user's own orders, newest first
    pub async fn find_for_user(&self, user_id: &Uuid) -> ShopResult<Vec<OrderView>> {
        let mut orders = self.orders.search("user_id", &user_id.to_string()).await?;
        newest_first(&mut orders);
        self.with_products(orders, None).await
    }

    /// Every order with product and buyer details, newest first
    pub async fn find_all(&self, identity: &Identity) -> ShopResult<Vec<OrderView>> {
        authorize(identity, Role::Admin)?;

        let mut orders = self.orders.list().await?;
        newest_first(&mut orders);

        let mut user_ids: Vec<Uuid> = orders.iter().map(|order| order.user_id).collect();
        user_ids.sort();
        user_ids.dedup();
        let users = self.users.get_many(&user_ids).await?;

        self.with_products(orders, Some(&users)).await
    }

    /// One order, visible to its owner and to admins
    ///
    /// Orders the caller may not see are reported as missing rather than
    /// forbidden, so their existence does not leak.
    pub async fn find_one(&self, identity: &Identity, order_id: &Uuid) -> ShopResult<OrderView> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .filter(|order| AuthPolicy::owner_or_admin(order.user_id).check(identity))
            .ok_or_else(|| ShopError::not_found(Order::resource_name_singular(), order_id))?;

        let mut views = self.with_products(vec![order], None).await?;
        views
            .pop()
            .ok_or_else(|| ShopError::not_found(Order::resource_name_singular(), order_id))
    }

    /// Move an order to any status
    pub async fn update_status(&self, identity: &Identity, order_id: &Uuid, status: OrderStatus) -> ShopResult<OrderView> {
        authorize(identity, Role::Admin)?;

        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| ShopError::not_found(Order::resource_name_singular(), order_id))?;

        let previous = order.status;
        order.status = status;
        order.touch();

        let order = self
            .orders
            .update(order_id, order)
            .await?
            .ok_or_else(|| ShopError::not_found(Order::resource_name_singular(), order_id))?;

        tracing::info!(
            order_id = %order.id,
            from = %previous,
            to = %status,
            admin_id = %identity.user_id,
            "Order status changed"
        );

        let mut views = self.with_products(vec![order], None).await?;
        views
            .pop()
            .ok_or_else(|| ShopError::not_found(Order::resource_name_singular(), order_id))
    }
}
