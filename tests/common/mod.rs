//! Shared fixtures for the integration tests
#![allow(dead_code)]

use shop::prelude::*;
use std::sync::Arc;

/// Retry settings that keep failing-store tests fast
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay_ms: 1,
        max_delay_ms: 5,
        multiplier: 2.0,
    }
}

pub fn host() -> ShopHost {
    ShopHost::new(Stores::in_memory("uploads"), fast_retry())
}

pub fn host_with_cart(cart: Arc<dyn CartStore>) -> ShopHost {
    let mut stores = Stores::in_memory("uploads");
    stores.cart = cart;
    ShopHost::new(stores, fast_retry())
}

pub fn admin() -> Identity {
    Identity::admin(Uuid::new_v4())
}

pub fn customer() -> Identity {
    Identity::customer(Uuid::new_v4())
}

pub fn dec(raw: &str) -> Decimal {
    raw.parse().expect("valid decimal literal")
}

pub async fn seed_category(host: &ShopHost, name: &str) -> Category {
    host.catalog
        .create_category(
            &admin(),
            CreateCategoryRequest {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .expect("category should be created")
}

pub async fn seed_product(host: &ShopHost, category: &Category, name: &str, price: &str) -> Product {
    host.catalog
        .create_product(
            &admin(),
            CreateProductRequest {
                name: name.to_string(),
                description: None,
                price: dec(price),
                category_id: category.id.to_string(),
                stock: 10,
                image: None,
            },
        )
        .await
        .expect("product should be created")
}
