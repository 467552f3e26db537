//! Service trait for document persistence

use crate::core::entity::Entity;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Service trait for managing one collection of entities
///
/// Implementations provide CRUD operations for a specific entity type.
/// The shop services are agnostic to the underlying storage mechanism.
/// Errors are storage failures; "not there" is reported through `Option`
/// and `bool` returns.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities, newest first
    async fn list(&self) -> Result<Vec<T>>;

    /// Replace an existing entity. Returns `None` when no entity has that id
    async fn update(&self, id: &Uuid, entity: T) -> Result<Option<T>>;

    /// Delete an entity. Returns whether something was deleted
    async fn delete(&self, id: &Uuid) -> Result<bool>;

    /// Search entities whose top-level `field` equals `value`
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>>;

    /// Fetch several entities at once; missing ids are absent from the map
    async fn get_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, T>> {
        let mut found = HashMap::with_capacity(ids.len());
        for id in ids {
            if found.contains_key(id) {
                continue;
            }
            if let Some(entity) = self.get(id).await? {
                found.insert(*id, entity);
            }
        }
        Ok(found)
    }

    /// Check whether an entity exists
    async fn exists(&self, id: &Uuid) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
