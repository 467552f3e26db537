//! Per-user checkout serialization
//!
//! Two checkouts for the same user must not both read the same cart. The
//! guard hands out one async lock per user id; checkouts for different
//! users never wait on each other. The lock only covers this process.

use crate::core::error::ShopResult;
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Held for the duration of one checkout
pub struct CheckoutPermit {
    _guard: OwnedMutexGuard<()>,
}

#[derive(Clone, Default)]
pub struct CheckoutGuard {
    locks: Arc<Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>>,
}

impl CheckoutGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other checkout for `user_id` is in flight
    pub async fn acquire(&self, user_id: Uuid) -> ShopResult<CheckoutPermit> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|e| anyhow!("Failed to acquire checkout registry: {}", e))?;

            // Entries referenced only by the map are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(user_id).or_default().clone()
        };

        Ok(CheckoutPermit {
            _guard: lock.lock_owned().await,
        })
    }

    /// Number of users with a checkout in flight or queued
    pub fn in_flight(&self) -> usize {
        self.locks
            .lock()
            .map(|locks| {
                locks
                    .values()
                    .filter(|lock| Arc::strong_count(lock) > 1)
                    .count()
            })
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_waits() {
        let guard = CheckoutGuard::new();
        let user = Uuid::new_v4();

        let permit = guard.acquire(user).await.unwrap();
        let second = tokio::time::timeout(Duration::from_millis(50), guard.acquire(user)).await;
        assert!(second.is_err(), "second checkout should still be waiting");

        drop(permit);
        let third = tokio::time::timeout(Duration::from_millis(50), guard.acquire(user)).await;
        assert!(third.is_ok());
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let guard = CheckoutGuard::new();
        let _alice = guard.acquire(Uuid::new_v4()).await.unwrap();
        let bob = tokio::time::timeout(Duration::from_millis(50), guard.acquire(Uuid::new_v4())).await;
        assert!(bob.is_ok());
        assert_eq!(guard.in_flight(), 2);
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let guard = CheckoutGuard::new();
        for _ in 0..10 {
            let permit = guard.acquire(Uuid::new_v4()).await.unwrap();
            drop(permit);
        }
        let _permit = guard.acquire(Uuid::new_v4()).await.unwrap();
        assert_eq!(guard.locks.lock().unwrap().len(), 1);
    }
}
