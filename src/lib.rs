//! # Smart Shop
//!
//! Backend core for a small online shop: a catalog of categories and
//! products, per-user carts, checkout and the order lifecycle, with
//! role-based access control.
//!
//! ## Features
//!
//! - **Cart aggregation**: one line per (user, product), atomic increments
//! - **Checkout**: price snapshots, exact decimal totals, per-user serialization
//! - **Order lifecycle**: owner/admin visibility, admin status changes
//! - **User administration**: admin-only listing, editing and removal of profiles
//! - **Referential integrity**: category and product references checked on write
//! - **Pluggable storage**: in-memory (default) or MongoDB (`mongodb_backend`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop::prelude::*;
//!
//! let host = ShopHost::in_memory();
//! let admin = Identity::admin(Uuid::new_v4());
//!
//! let books = host.catalog.create_category(&admin, CreateCategoryRequest {
//!     name: "Books".into(),
//!     description: None,
//! }).await?;
//!
//! ServerBuilder::new().with_host(host).serve("127.0.0.1:3000").await?;
//! ```

pub mod cart;
pub mod catalog;
pub mod config;
pub mod core;
pub mod entities;
pub mod orders;
pub mod server;
pub mod storage;
pub mod users;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthPolicy, Identity, Role, authorize},
        entity::Entity,
        error::{ErrorKind, ShopError, ShopResult},
        retry::RetryConfig,
        service::DataService,
        validation::Validated,
    };

    // === Macros ===
    pub use crate::{define_entity, impl_entity};

    // === Domain ===
    pub use crate::cart::{CartLine, CartLineView, CartService, CartStore, model::AddToCartRequest};
    pub use crate::catalog::{
        CatalogService, Category, Product, ProductView,
        model::{CreateCategoryRequest, CreateProductRequest, UpdateCategoryRequest, UpdateProductRequest},
    };
    pub use crate::orders::{CheckoutService, Order, OrderItem, OrderService, OrderStatus, OrderView};
    pub use crate::users::{UpdateUserRequest, UserProfile, UserService, UserSummary};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::{InMemoryCartStore, InMemoryDataService};
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::{MongoCartStore, MongoDataService};
    pub use crate::storage::{LocalObjectStore, ObjectStore};

    // === Config & Server ===
    pub use crate::config::ShopConfig;
    pub use crate::server::{ServerBuilder, ShopHost, Stores};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
