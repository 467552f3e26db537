//! Server host holding the wired shop services
//!
//! The host is transport-agnostic: it owns the storage handles and the
//! services built on them. HTTP handlers, tests and any other exposure
//! share one `Arc<ShopHost>`.

use crate::cart::service::CartService;
use crate::cart::store::CartStore;
use crate::catalog::model::{Category, Product};
use crate::catalog::service::CatalogService;
use crate::config::StorageConfig;
use crate::core::retry::RetryConfig;
use crate::core::service::DataService;
use crate::orders::checkout::CheckoutService;
use crate::orders::lifecycle::OrderService;
use crate::orders::model::Order;
use crate::storage::{LocalObjectStore, ObjectStore};
use crate::users::{UserProfile, UserService};
use anyhow::Result;
use std::sync::Arc;

/// The persistence handles every service is built from
#[derive(Clone)]
pub struct Stores {
    pub categories: Arc<dyn DataService<Category>>,
    pub products: Arc<dyn DataService<Product>>,
    pub cart: Arc<dyn CartStore>,
    pub orders: Arc<dyn DataService<Order>>,
    pub users: Arc<dyn DataService<UserProfile>>,
    pub objects: Arc<dyn ObjectStore>,
}

impl Stores {
    /// Fresh, empty in-memory collections
    #[cfg(feature = "in-memory")]
    pub fn in_memory(upload_path: &str) -> Self {
        use crate::storage::{InMemoryCartStore, InMemoryDataService};

        Self {
            categories: Arc::new(InMemoryDataService::<Category>::new()),
            products: Arc::new(InMemoryDataService::<Product>::new()),
            cart: Arc::new(InMemoryCartStore::new()),
            orders: Arc::new(InMemoryDataService::<Order>::new()),
            users: Arc::new(InMemoryDataService::<UserProfile>::new()),
            objects: Arc::new(LocalObjectStore::new(upload_path)),
        }
    }

    /// Collections in a MongoDB database, with their indexes in place
    #[cfg(feature = "mongodb_backend")]
    pub async fn mongodb(config: &StorageConfig) -> Result<Self> {
        use crate::storage::mongodb::connect;
        use crate::storage::{MongoCartStore, MongoDataService};

        let database = connect(&config.mongo_uri, &config.database).await?;

        let categories = MongoDataService::<Category>::new(database.clone());
        categories.ensure_index("name", true).await?;
        let products = MongoDataService::<Product>::new(database.clone());
        products.ensure_index("category_id", false).await?;
        let orders = MongoDataService::<Order>::new(database.clone());
        orders.ensure_index("user_id", false).await?;
        let cart = MongoCartStore::new(database.clone());
        cart.ensure_indexes().await?;

        Ok(Self {
            categories: Arc::new(categories),
            products: Arc::new(products),
            cart: Arc::new(cart),
            orders: Arc::new(orders),
            users: Arc::new(MongoDataService::<UserProfile>::new(database)),
            objects: Arc::new(LocalObjectStore::new(&config.upload_path)),
        })
    }

    /// Open the backend selected in the configuration
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        use crate::config::StorageBackend;

        match config.backend {
            StorageBackend::InMemory => Self::open_in_memory(config),
            StorageBackend::Mongodb => Self::open_mongodb(config).await,
        }
    }

    #[cfg(feature = "in-memory")]
    fn open_in_memory(config: &StorageConfig) -> Result<Self> {
        tracing::warn!("Using in-memory storage, data is lost on shutdown");
        Ok(Self::in_memory(&config.upload_path))
    }

    #[cfg(not(feature = "in-memory"))]
    fn open_in_memory(_config: &StorageConfig) -> Result<Self> {
        anyhow::bail!("in-memory storage requires the `in-memory` feature")
    }

    #[cfg(feature = "mongodb_backend")]
    async fn open_mongodb(config: &StorageConfig) -> Result<Self> {
        Self::mongodb(config).await
    }

    #[cfg(not(feature = "mongodb_backend"))]
    async fn open_mongodb(_config: &StorageConfig) -> Result<Self> {
        anyhow::bail!("MongoDB storage requires the `mongodb_backend` feature")
    }
}

/// Host context containing every shop service
#[derive(Clone)]
pub struct ShopHost {
    pub stores: Stores,
    pub catalog: CatalogService,
    pub cart: CartService,
    pub checkout: CheckoutService,
    pub orders: OrderService,
    pub users: UserService,
}

impl ShopHost {
    /// Wire the services on top of the given stores
    pub fn new(stores: Stores, checkout_retry: RetryConfig) -> Self {
        let catalog = CatalogService::new(
            stores.categories.clone(),
            stores.products.clone(),
            stores.objects.clone(),
        );
        let cart = CartService::new(stores.cart.clone(), catalog.clone());
        let checkout = CheckoutService::new(cart.clone(), stores.orders.clone(), checkout_retry);
        let orders = OrderService::new(stores.orders.clone(), stores.users.clone(), catalog.clone());
        let users = UserService::new(stores.users.clone());

        Self {
            stores,
            catalog,
            cart,
            checkout,
            orders,
            users,
        }
    }

    /// An in-memory host, handy for tests and local development
    #[cfg(feature = "in-memory")]
    pub fn in_memory() -> Self {
        Self::new(Stores::in_memory("uploads"), RetryConfig::default())
    }
}
