//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoDataService<T>` and `MongoCartStore` backed by a
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! One collection per entity type, named by `T::resource_name()`
//! ("categories", "products", "orders", "users"). Cart lines live in
//! `cart_items` with a unique (user_id, product_id) index so the
//! upsert-increment in [`MongoCartStore::add_quantity`] can never create a
//! second line for the same pair.
//!
//! # Serialization strategy
//!
//! Entities go through `serde_json::Value` before BSON, so UUIDs, decimals
//! and timestamps are stored as strings. The `id` field is mapped to
//! MongoDB's `_id` convention. Ordering by `created_at` is done after
//! fetching, because RFC 3339 strings with variable fractional digits do
//! not sort lexically.

use crate::cart::model::CartLine;
use crate::cart::store::{CartStore, MAX_LINE_QUANTITY};
use crate::core::{DataService, Entity};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Database, IndexModel};
use std::collections::HashMap;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain entity convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn timestamp_bson() -> Bson {
    Bson::String(Utc::now().to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn to_entity<T: Entity>(doc: Document) -> Result<T> {
    serde_json::from_value(document_to_json(doc)).map_err(|e| {
        anyhow!(
            "Failed to deserialize {} from document: {}",
            T::resource_name_singular(),
            e
        )
    })
}

fn sort_newest_first<T: Entity>(entities: &mut [T]) {
    entities.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == 11000,
        ErrorKind::Command(e) => e.code == 11000,
        _ => false,
    }
}

/// Open a database handle
pub async fn connect(uri: &str, database: &str) -> Result<Database> {
    let client = Client::with_uri_str(uri)
        .await
        .map_err(|e| anyhow!("Failed to connect to MongoDB: {}", e))?;
    tracing::info!(database = database, "Connected to MongoDB");
    Ok(client.database(database))
}

// ---------------------------------------------------------------------------
// MongoDataService<T>
// ---------------------------------------------------------------------------

/// Generic data storage service backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// let db = shop::storage::mongodb::connect("mongodb://localhost:27017", "shop").await?;
/// let products = MongoDataService::<Product>::new(db);
/// let product = products.create(product).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoDataService<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoDataService<T> {
    /// Create a new `MongoDataService` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Entity> MongoDataService<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::resource_name())
    }

    fn entity_to_document(entity: &T) -> Result<Document> {
        let json = serde_json::to_value(entity)
            .map_err(|e| anyhow!("Failed to serialize entity: {}", e))?;
        json_to_document(json)
    }

    /// Create a single-field index. Idempotent, safe to call on every startup.
    pub async fn ensure_index(&self, field: &str, unique: bool) -> Result<()> {
        let options = IndexOptions::builder().unique(unique).build();
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(options)
            .build();

        self.collection().create_index(index).await.map_err(|e| {
            anyhow!(
                "Failed to create index on {}.{}: {}",
                T::resource_name(),
                field,
                e
            )
        })?;

        Ok(())
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<T>> {
        let cursor = self
            .collection()
            .find(filter)
            .await
            .map_err(|e| anyhow!("Failed to query {}: {}", T::resource_name(), e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect {}: {}", T::resource_name(), e))?;

        let mut entities = docs
            .into_iter()
            .map(to_entity::<T>)
            .collect::<Result<Vec<_>>>()?;
        sort_newest_first(&mut entities);
        Ok(entities)
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for MongoDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let doc = Self::entity_to_document(&entity)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| anyhow!("Failed to create {}: {}", T::resource_name_singular(), e))?;

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to get {}: {}", T::resource_name_singular(), e))?;

        doc.map(to_entity::<T>).transpose()
    }

    async fn list(&self) -> Result<Vec<T>> {
        self.find_many(doc! {}).await
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<Option<T>> {
        let doc = Self::entity_to_document(&entity)?;

        let result = self
            .collection()
            .replace_one(doc! { "_id": uuid_bson(id) }, doc)
            .await
            .map_err(|e| anyhow!("Failed to update {}: {}", T::resource_name_singular(), e))?;

        if result.matched_count == 0 {
            return Ok(None);
        }
        Ok(Some(entity))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to delete {}: {}", T::resource_name_singular(), e))?;

        Ok(result.deleted_count > 0)
    }

    /// Search entities by field value.
    ///
    /// Values are matched as strings and, when they parse, as native
    /// integers or booleans.
    async fn search(&self, field: &str, value: &str) -> Result<Vec<T>> {
        let mut variants: Vec<Bson> = vec![Bson::String(value.to_string())];

        match value {
            "true" => variants.push(Bson::Boolean(true)),
            "false" => variants.push(Bson::Boolean(false)),
            _ => {
                if let Ok(i) = value.parse::<i64>() {
                    variants.push(Bson::Int64(i));
                }
            }
        }

        let field = if field == "id" { "_id" } else { field };
        self.find_many(doc! { field: { "$in": variants } }).await
    }

    async fn get_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, T>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let keys: Vec<Bson> = ids.iter().map(uuid_bson).collect();
        let found = self.find_many(doc! { "_id": { "$in": keys } }).await?;

        Ok(found.into_iter().map(|entity| (entity.id(), entity)).collect())
    }
}

// ---------------------------------------------------------------------------
// MongoCartStore
// ---------------------------------------------------------------------------

/// Cart line storage backed by MongoDB.
#[derive(Clone, Debug)]
pub struct MongoCartStore {
    database: Database,
}

impl MongoCartStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(<CartLine as Entity>::resource_name())
    }

    /// Create the unique (user_id, product_id) index and a user_id index.
    ///
    /// This method is idempotent, safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "product_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| anyhow!("Failed to create indexes on cart_items collection: {}", e))?;

        Ok(())
    }

    async fn upsert_increment(
        &self,
        user_id: &Uuid,
        product_id: &Uuid,
        quantity: u32,
    ) -> std::result::Result<Option<Document>, mongodb::error::Error> {
        let now = timestamp_bson();
        // An existing line too full for the increment does not match, so the
        // upsert falls through to an insert that the unique index rejects.
        let filter = doc! {
            "user_id": uuid_bson(user_id),
            "product_id": uuid_bson(product_id),
            "quantity": { "$lte": i64::from(MAX_LINE_QUANTITY) - i64::from(quantity) },
        };
        let update = doc! {
            "$inc": { "quantity": i64::from(quantity) },
            "$set": { "updated_at": now.clone() },
            "$setOnInsert": {
                "_id": uuid_bson(&Uuid::new_v4()),
                "created_at": now,
            },
        };

        self.collection()
            .find_one_and_update(filter, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
    }
}

#[async_trait]
impl CartStore for MongoCartStore {
    async fn add_quantity(&self, user_id: &Uuid, product_id: &Uuid, quantity: u32) -> Result<Option<CartLine>> {
        // Two concurrent upserts may both try to insert; the loser hits the
        // unique index and succeeds as an update on the second pass. A
        // second duplicate key means the line exists but is too full.
        let doc = match self.upsert_increment(user_id, product_id, quantity).await {
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!(user_id = %user_id, product_id = %product_id, "Cart upsert raced, retrying");
                match self.upsert_increment(user_id, product_id, quantity).await {
                    Err(e) if is_duplicate_key(&e) => return Ok(None),
                    other => other,
                }
            }
            other => other,
        }
        .map_err(|e| anyhow!("Failed to add to cart: {}", e))?
        .ok_or_else(|| anyhow!("Cart line missing after upsert"))?;

        to_entity::<CartLine>(doc).map(Some)
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<CartLine>> {
        let cursor = self
            .collection()
            .find(doc! { "user_id": uuid_bson(user_id) })
            .await
            .map_err(|e| anyhow!("Failed to list cart: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect cart: {}", e))?;

        let mut lines = docs
            .into_iter()
            .map(to_entity::<CartLine>)
            .collect::<Result<Vec<_>>>()?;
        lines.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(lines)
    }

    async fn remove_for_user(&self, user_id: &Uuid, line_id: &Uuid) -> Result<bool> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(line_id), "user_id": uuid_bson(user_id) })
            .await
            .map_err(|e| anyhow!("Failed to remove cart line: {}", e))?;

        Ok(result.deleted_count > 0)
    }

    async fn remove_lines(&self, user_id: &Uuid, consumed: &[(Uuid, u32)]) -> Result<u64> {
        let collection = self.collection();
        let mut deleted = 0;

        for (line_id, quantity) in consumed {
            let quantity = i64::from(*quantity);
            let exact = collection
                .delete_one(doc! {
                    "_id": uuid_bson(line_id),
                    "user_id": uuid_bson(user_id),
                    "quantity": { "$lte": quantity },
                })
                .await
                .map_err(|e| anyhow!("Failed to remove cart line: {}", e))?;
            if exact.deleted_count > 0 {
                deleted += 1;
                continue;
            }

            collection
                .update_one(
                    doc! {
                        "_id": uuid_bson(line_id),
                        "user_id": uuid_bson(user_id),
                        "quantity": { "$gt": quantity },
                    },
                    doc! {
                        "$inc": { "quantity": -quantity },
                        "$set": { "updated_at": timestamp_bson() },
                    },
                )
                .await
                .map_err(|e| anyhow!("Failed to decrement cart line: {}", e))?;
        }

        Ok(deleted)
    }

    async fn clear(&self, user_id: &Uuid) -> Result<u64> {
        let result = self
            .collection()
            .delete_many(doc! { "user_id": uuid_bson(user_id) })
            .await
            .map_err(|e| anyhow!("Failed to clear cart: {}", e))?;

        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::model::Product;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[test]
    fn json_to_document_renames_id_to_underscore_id() {
        let input = json!({"id": "abc", "name": "test"});
        let doc = json_to_document(input).unwrap();

        assert!(doc.contains_key("_id"));
        assert!(!doc.contains_key("id"));
        assert_eq!(doc.get_str("_id").unwrap(), "abc");
    }

    #[test]
    fn json_to_document_non_object_returns_error() {
        let result = json_to_document(json!("string"));
        assert!(result.unwrap_err().to_string().contains("non-object"));
    }

    #[test]
    fn document_to_json_renames_underscore_id_to_id() {
        let json = document_to_json(doc! { "_id": "abc", "name": "test" });
        assert_eq!(json["id"], "abc");
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn product_survives_bson_conversion() {
        let product = Product::new(
            "Dune".to_string(),
            Some("Sand".to_string()),
            Decimal::new(1999, 2),
            Uuid::new_v4(),
            7,
            None,
        );

        let doc = MongoDataService::<Product>::entity_to_document(&product).unwrap();
        assert_eq!(doc.get_str("price").unwrap(), "19.99");

        let back: Product = to_entity(doc).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn cart_line_survives_bson_conversion() {
        let line = CartLine::new(Uuid::new_v4(), Uuid::new_v4(), 3);
        let doc = json_to_document(serde_json::to_value(&line).unwrap()).unwrap();
        let back: CartLine = to_entity(doc).unwrap();
        assert_eq!(back, line);
    }
}
