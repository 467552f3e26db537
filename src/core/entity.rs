//! Entity trait shared by every persisted document

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Base trait for all persisted entities.
///
/// Every entity carries:
/// - id: Unique identifier
/// - created_at: Creation timestamp
/// - updated_at: Last modification timestamp
///
/// Entities are serialized as JSON documents by the storage backends, so
/// the serde bounds are part of the contract. Use [`impl_entity!`] to
/// implement it for structs holding those three fields.
///
/// [`impl_entity!`]: crate::impl_entity
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The plural resource name, used as the collection name (e.g., "products")
    fn resource_name() -> &'static str;

    /// The singular resource name (e.g., "product")
    fn resource_name_singular() -> &'static str;

    /// Get the unique identifier for this entity instance
    fn id(&self) -> Uuid;

    /// Get the creation timestamp
    fn created_at(&self) -> DateTime<Utc>;

    /// Get the last update timestamp
    fn updated_at(&self) -> DateTime<Utc>;

    /// Bump `updated_at` to now
    fn touch(&mut self);
}
