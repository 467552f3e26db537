//! Persistence contract for cart lines

use crate::cart::model::CartLine;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Largest quantity a single cart line may hold, the full range of `u32`
pub const MAX_LINE_QUANTITY: u32 = u32::MAX;

/// Storage for cart lines keyed by (user, product)
///
/// Kept separate from the generic `DataService` because adding to a cart
/// is an atomic upsert-increment that a plain get-then-replace cannot
/// express without losing concurrent updates.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Add `quantity` to the user's line for `product_id`, creating it if needed
    ///
    /// Concurrent calls for the same pair must never lose an increment
    /// nor create a second line. Returns `None`, leaving the line untouched,
    /// when the new quantity would exceed [`MAX_LINE_QUANTITY`].
    async fn add_quantity(&self, user_id: &Uuid, product_id: &Uuid, quantity: u32) -> Result<Option<CartLine>>;

    /// All lines owned by the user, oldest first
    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<CartLine>>;

    /// Delete a line if it belongs to the user. Returns whether one was deleted
    async fn remove_for_user(&self, user_id: &Uuid, line_id: &Uuid) -> Result<bool>;

    /// Take back quantities previously read from the user's cart
    ///
    /// Each `(line_id, quantity)` pair deletes the line when it still holds
    /// exactly `quantity`, and decrements it when units were added since.
    /// Lines not listed are never touched. Returns how many lines were
    /// deleted.
    async fn remove_lines(&self, user_id: &Uuid, consumed: &[(Uuid, u32)]) -> Result<u64>;

    /// Delete every line owned by the user. Returns how many were deleted
    async fn clear(&self, user_id: &Uuid) -> Result<u64>;
}
