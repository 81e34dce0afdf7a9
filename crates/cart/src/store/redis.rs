//! Redis implementation of [`KeyValueStore`].
//!
//! Uses a `ConnectionManager`, which multiplexes one connection and
//! reconnects on failure. Each command is bounded by the configured command
//! timeout; connection problems and timeouts surface as
//! [`StoreError::Unavailable`].

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, RedisResult, Script};
use secrecy::ExposeSecret;
use tracing::instrument;

use super::{KeyValueStore, StoreError};
use crate::config::QuickcartConfig;

/// Decrement a hash field, deleting it when the result would be <= 0.
///
/// KEYS[1] = hash, ARGV[1] = field, ARGV[2] = amount. Returns the remaining
/// quantity (0 once deleted).
const DECR_OR_REMOVE_LUA: &str = r"
local current = tonumber(redis.call('HGET', KEYS[1], ARGV[1]) or '0')
local amount = tonumber(ARGV[2])
if amount >= current then
    redis.call('HDEL', KEYS[1], ARGV[1])
    return 0
end
return redis.call('HINCRBY', KEYS[1], ARGV[1], -amount)
";

/// Values per `LPUSH` inside a list rebuild.
const LPUSH_CHUNK: usize = 1000;

/// Redis-backed store.
pub struct RedisStore {
    conn: ConnectionManager,
    command_timeout: Duration,
    decr_or_remove: Script,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

impl RedisStore {
    /// Connect to Redis using the configured URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidUrl`] if the URL cannot be parsed and
    /// [`StoreError::Unavailable`] if the server cannot be reached within the
    /// connect timeout.
    pub async fn connect(config: &QuickcartConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.redis_url.expose_secret())
            .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "connection not established within {:?}",
                    config.connect_timeout
                ))
            })?
            .map_err(|e| map_redis_error("CONNECT", "", e))?;

        tracing::info!(
            command_timeout_ms = config.command_timeout.as_millis(),
            "Connected to Redis"
        );

        Ok(Self {
            conn,
            command_timeout: config.command_timeout,
            decr_or_remove: Script::new(DECR_OR_REMOVE_LUA),
        })
    }

    /// Run one round-trip under the command timeout.
    async fn run<T, F>(&self, op: &'static str, key: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = RedisResult<T>> + Send,
    {
        match tokio::time::timeout(self.command_timeout, fut).await {
            Ok(result) => result.map_err(|e| map_redis_error(op, key, e)),
            Err(_) => {
                tracing::warn!(op, key, timeout = ?self.command_timeout, "Redis command timed out");
                Err(StoreError::Unavailable(format!(
                    "{op} {key} timed out after {:?}",
                    self.command_timeout
                )))
            }
        }
    }
}

/// Classify a Redis error.
fn map_redis_error(op: &str, key: &str, err: RedisError) -> StoreError {
    if err.is_io_error()
        || err.is_connection_refusal()
        || err.is_connection_dropped()
        || err.is_timeout()
    {
        return StoreError::Unavailable(format!("{op}: {err}"));
    }
    if err.code() == Some("WRONGTYPE") {
        return StoreError::WrongType(key.to_owned());
    }
    StoreError::Command(format!("{op}: {err}"))
}

/// Clamp a list index into the range the client accepts.
fn list_index(index: i64) -> isize {
    isize::try_from(index).unwrap_or(if index < 0 { isize::MIN } else { isize::MAX })
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn hset_multiple(&self, key: &str, fields: &[(&str, String)]) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        self.run("HSET", key, async move { conn.hset_multiple(key, fields).await })
            .await
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        self.run("HGET", key, async move { conn.hget(key, field).await })
            .await
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut conn = self.conn.clone();
        self.run("HGETALL", key, async move { conn.hgetall(key).await })
            .await
    }

    async fn hdel(&self, key: &str, field: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = self
            .run("HDEL", key, async move { conn.hdel(key, field).await })
            .await?;
        Ok(removed > 0)
    }

    async fn hincr_by(&self, key: &str, field: &str, delta: i64) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        self.run("HINCRBY", key, async move { conn.hincr(key, field, delta).await })
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn hdecr_or_remove(
        &self,
        key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let script = &self.decr_or_remove;
        self.run("EVALSHA", key, async move {
            script
                .key(key)
                .arg(field)
                .arg(amount)
                .invoke_async(&mut conn)
                .await
        })
        .await
    }

    async fn del(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let removed: i64 = self
            .run("DEL", key, async move { conn.del(key).await })
            .await?;
        Ok(removed > 0)
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        self.run("EXISTS", key, async move { conn.exists(key).await })
            .await
    }

    #[instrument(level = "debug", skip(self, values), fields(count = values.len()))]
    async fn replace_list_prepending(&self, key: &str, values: &[i64]) -> Result<(), StoreError> {
        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();
        for chunk in values.chunks(LPUSH_CHUNK) {
            pipe.lpush(key, chunk).ignore();
        }

        let mut conn = self.conn.clone();
        self.run("MULTI", key, async move { pipe.query_async(&mut conn).await })
            .await
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        let (start, stop) = (list_index(start), list_index(stop));
        self.run("LRANGE", key, async move { conn.lrange(key, start, stop).await })
            .await
    }

    async fn llen(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        self.run("LLEN", key, async move { conn.llen(key).await })
            .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _pong: String = self
            .run("PING", "", async move {
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;
        Ok(())
    }
}
