//! Catalog of categories and products
//!
//! Besides CRUD, the catalog owns the referential checks consumed by the
//! cart and checkout: a product's category must exist when it is written,
//! and product lookups tolerate documents deleted since they were
//! referenced.

pub mod model;
pub mod service;

pub use model::{Category, Product, ProductView};
pub use service::CatalogService;
