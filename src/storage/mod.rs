//! Storage implementations for different backends

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;
pub mod object_store;

#[cfg(feature = "in-memory")]
pub use in_memory::{InMemoryCartStore, InMemoryDataService};
#[cfg(feature = "mongodb_backend")]
pub use mongodb::{MongoCartStore, MongoDataService};
pub use object_store::{LocalObjectStore, ObjectStore};
