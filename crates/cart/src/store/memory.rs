//! In-process [`KeyValueStore`] for tests and local runs.
//!
//! Every operation takes the map lock once, so the compound operations are
//! atomic with respect to each other exactly as they are on Redis.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KeyValueStore, StoreError};

#[derive(Debug, Clone)]
enum Entry {
    Hash(HashMap<String, String>),
    List(VecDeque<String>),
}

/// A [`KeyValueStore`] backed by a `HashMap` behind an async `RwLock`.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the store going away (`false`) or coming back (`true`).
    ///
    /// While unavailable every operation fails with
    /// [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of keys currently held.
    pub async fn key_count(&self) -> usize {
        self.entries.read().await.len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        }
    }
}

fn as_hash<'a>(key: &str, entry: &'a Entry) -> Result<&'a HashMap<String, String>, StoreError> {
    match entry {
        Entry::Hash(hash) => Ok(hash),
        Entry::List(_) => Err(StoreError::WrongType(key.to_owned())),
    }
}

fn as_hash_mut<'a>(
    key: &str,
    entry: &'a mut Entry,
) -> Result<&'a mut HashMap<String, String>, StoreError> {
    match entry {
        Entry::Hash(hash) => Ok(hash),
        Entry::List(_) => Err(StoreError::WrongType(key.to_owned())),
    }
}

fn parse_int(value: &str) -> Result<i64, StoreError> {
    value
        .parse::<i64>()
        .map_err(|_| StoreError::Command("hash value is not an integer".to_string()))
}

/// Resolve `LRANGE` bounds against a list of `len` elements.
///
/// Returns `None` when the range selects nothing.
fn resolve_range(len: usize, start: i64, stop: i64) -> Option<(usize, usize)> {
    let len = i64::try_from(len).ok()?;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
    if start >= len || start > stop {
        return None;
    }
    Some((usize::try_from(start).ok()?, usize::try_from(stop).ok()?))
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> Result<(), StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        let hash = as_hash_mut(key, entry)?;
        for (field, value) in fields {
            hash.insert((*field).to_owned(), value.clone());
        }
        Ok(())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) => Ok(as_hash(key, entry)?.get(field).cloned()),
            None => Ok(None),
        }
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) => Ok(as_hash(key, entry)?.clone()),
            None => Ok(HashMap::new()),
        }
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            return Ok(false);
        };
        let hash = as_hash_mut(key, entry)?;
        let removed = hash.remove(field).is_some();
        if hash.is_empty() {
            entries.remove(key);
        }
        Ok(removed)
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let current = match entries.get(key) {
            Some(entry) => as_hash(key, entry)?
                .get(field)
                .map_or(Ok(0), |v| parse_int(v))?,
            None => 0,
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::Command("increment or decrement would overflow".to_string()))?;

        // Only touch the map once the increment is known to succeed.
        let entry = entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::Hash(HashMap::new()));
        as_hash_mut(key, entry)?.insert(field.to_owned(), next.to_string());
        Ok(next)
    }

    async fn hdecr_or_remove(
        &self,
        key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            return Ok(0);
        };
        let hash = as_hash_mut(key, entry)?;
        let current = hash.get(field).map_or(Ok(0), |v| parse_int(v))?;
        if amount >= current {
            hash.remove(field);
            if hash.is_empty() {
                entries.remove(key);
            }
            return Ok(0);
        }
        let next = current - amount;
        hash.insert(field.to_owned(), next.to_string());
        Ok(next)
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.entries.read().await.contains_key(key))
    }

    async fn replace_list_prepending(&self, key: &str, values: &[i64]) -> Result<(), StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        entries.remove(key);
        if values.is_empty() {
            return Ok(());
        }
        let mut list = VecDeque::with_capacity(values.len());
        for value in values {
            list.push_front(value.to_string());
        }
        entries.insert(key.to_owned(), Entry::List(list));
        Ok(())
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        let list = match entries.get(key) {
            Some(Entry::List(list)) => list,
            Some(Entry::Hash(_)) => return Err(StoreError::WrongType(key.to_owned())),
            None => return Ok(Vec::new()),
        };
        Ok(resolve_range(list.len(), start, stop)
            .map(|(from, to)| list.range(from..=to).cloned().collect())
            .unwrap_or_default())
    }

    async fn llen(&self, key: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(Entry::List(list)) => Ok(list.len() as u64),
            Some(Entry::Hash(_)) => Err(StoreError::WrongType(key.to_owned())),
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
