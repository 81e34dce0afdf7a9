//! Key-value store seam.
//!
//! Services never talk to Redis directly. They go through [`KeyValueStore`],
//! which covers exactly the hash and list operations the cart and sequence
//! logic need, plus the two compound operations that must be atomic on the
//! server:
//!
//! - [`KeyValueStore::hdecr_or_remove`] - decrement a hash field, deleting it
//!   once it would reach zero
//! - [`KeyValueStore::replace_list_prepending`] - clear a list and rebuild it
//!   from a batch of prepends
//!
//! # Implementations
//!
//! - [`RedisStore`] - production store over a reconnecting connection manager
//! - [`MemoryStore`] - in-process store with the same semantics, for tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

mod memory;
mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or did not answer in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The key holds a value of a different type than the operation expects.
    #[error("wrong type for key {0}")]
    WrongType(String),

    /// The store rejected the command.
    #[error("store command failed: {0}")]
    Command(String),

    /// The connection URL could not be parsed.
    #[error("invalid store URL: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    /// Whether the failure means the store itself is unreachable.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Hash and list operations against a remote key-value store.
///
/// All list indices follow the Redis `LRANGE` convention: inclusive bounds,
/// negative values count back from the tail (`-1` is the last element).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Set several hash fields at once, creating the hash if needed.
    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> Result<(), StoreError>;

    /// Read one hash field.
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError>;

    /// Read every field of a hash. A missing key reads as an empty map.
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError>;

    /// Delete a hash field. Returns whether the field existed.
    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError>;

    /// Add `delta` to an integer hash field (missing reads as zero) and
    /// return the new value.
    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError>;

    /// Atomically subtract `amount` from an integer hash field.
    ///
    /// If `amount` is at least the current value (missing reads as zero) the
    /// field is deleted and `0` is returned; otherwise the decremented value
    /// is stored and returned.
    async fn hdecr_or_remove(&self, key: &str, field: &str, amount: i64)
    -> Result<i64, StoreError>;

    /// Delete a key of any type. Returns whether it existed.
    async fn del(&self, key: &str) -> Result<bool, StoreError>;

    /// Whether a key exists.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Atomically clear the list at `key` and prepend each value in order.
    ///
    /// Prepending `[1, 2, 3]` leaves the list as `[3, 2, 1]`. No reader
    /// observes the list between the clear and the last prepend. An empty
    /// `values` slice leaves the key absent.
    async fn replace_list_prepending(&self, key: &str, values: &[i64]) -> Result<(), StoreError>;

    /// Read the inclusive range `start..=stop` of a list.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError>;

    /// Length of a list (zero when absent).
    async fn llen(&self, key: &str) -> Result<u64, StoreError>;

    /// Round-trip check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Lets callers keep a handle to a store they hand to
/// [`AppState`](crate::AppState), e.g. to flip a [`MemoryStore`] offline in tests.
#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> Result<(), StoreError> {
        (**self).hset_multiple(key, fields).await
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        (**self).hget(key, field).await
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        (**self).hgetall(key).await
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        (**self).hdel(key, field).await
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        (**self).hincr_by(key, field, delta).await
    }

    async fn hdecr_or_remove(
        &self,
        key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64, StoreError> {
        (**self).hdecr_or_remove(key, field, amount).await
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        (**self).del(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        (**self).exists(key).await
    }

    async fn replace_list_prepending(&self, key: &str, values: &[i64]) -> Result<(), StoreError> {
        (**self).replace_list_prepending(key, values).await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        (**self).lrange(key, start, stop).await
    }

    async fn llen(&self, key: &str) -> Result<u64, StoreError> {
        (**self).llen(key).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }
}
