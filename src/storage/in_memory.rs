//! In-memory storage for testing and development

use crate::cart::model::CartLine;
use crate::cart::store::CartStore;
use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone)]
pub struct InMemoryDataService<T> {
    entities: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> InMemoryDataService<T> {
    /// Create a new in-memory data service
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first<T: Entity>(mut entities: Vec<T>) -> Vec<T> {
    entities.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    entities
}

/// Compare a serialized field with a search value
///
/// Strings compare verbatim, other scalars through their JSON text.
fn field_matches(document: &Value, field: &str, value: &str) -> bool {
    match document.get(field) {
        Some(Value::String(s)) => s == value,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == value,
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        if entities.contains_key(&entity.id()) {
            return Err(anyhow!(
                "{} with id '{}' already exists",
                T::resource_name_singular(),
                entity.id()
            ));
        }
        entities.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entities.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(newest_first(entities.values().cloned().collect()))
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<Option<T>> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        match entities.get_mut(id) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(entities.remove(id).is_some())
    }

    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut matches = Vec::new();
        for entity in entities.values() {
            let document = serde_json::to_value(entity)?;
            if field_matches(&document, field, value) {
                matches.push(entity.clone());
            }
        }

        Ok(newest_first(matches))
    }
}

/// In-memory cart store
///
/// Every mutation runs under one write lock, which makes the
/// upsert-increment atomic.
#[derive(Clone, Default)]
pub struct InMemoryCartStore {
    lines: Arc<RwLock<HashMap<Uuid, CartLine>>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn add_quantity(&self, user_id: &Uuid, product_id: &Uuid, quantity: u32) -> Result<Option<CartLine>> {
        let mut lines = self
            .lines
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let existing = lines
            .values_mut()
            .find(|line| &line.user_id == user_id && &line.product_id == product_id);

        if let Some(line) = existing {
            let Some(total) = line.quantity.checked_add(quantity) else {
                return Ok(None);
            };
            line.quantity = total;
            line.updated_at = Utc::now();
            return Ok(Some(line.clone()));
        }

        let line = CartLine::new(*user_id, *product_id, quantity);
        lines.insert(line.id, line.clone());
        Ok(Some(line))
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<CartLine>> {
        let lines = self
            .lines
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let mut owned: Vec<CartLine> = lines
            .values()
            .filter(|line| &line.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(owned)
    }

    async fn remove_for_user(&self, user_id: &Uuid, line_id: &Uuid) -> Result<bool> {
        let mut lines = self
            .lines
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let owned = lines.get(line_id).is_some_and(|line| &line.user_id == user_id);
        if owned {
            lines.remove(line_id);
        }

        Ok(owned)
    }

    async fn remove_lines(&self, user_id: &Uuid, consumed: &[(Uuid, u32)]) -> Result<u64> {
        let mut lines = self
            .lines
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let mut deleted = 0;
        for (line_id, quantity) in consumed {
            let Some(line) = lines.get_mut(line_id).filter(|line| &line.user_id == user_id) else {
                continue;
            };
            if line.quantity > *quantity {
                line.quantity -= quantity;
                line.updated_at = Utc::now();
            } else {
                lines.remove(line_id);
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn clear(&self, user_id: &Uuid) -> Result<u64> {
        let mut lines = self
            .lines
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let before = lines.len();
        lines.retain(|_, line| &line.user_id != user_id);

        Ok((before - lines.len()) as u64)
    }
}
