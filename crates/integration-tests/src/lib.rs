//! Integration tests for Quickcart.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process store only
//! cargo test -p quickcart-integration-tests
//!
//! # Include the tests that need a live Redis
//! REDIS_URL=redis://127.0.0.1:6379/15 cargo test -p quickcart-integration-tests -- --include-ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - the sample shopping scenario and cart invariants
//! - `sequence` - bulk list rebuild and range reads
//! - `redis_store` - the same contract against a real server (ignored by default)

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use quickcart::db::{CatalogRepository, UserRepository};
use quickcart::{AppState, Keys, MemoryStore, QuickcartConfig, RedisStore};
use quickcart_core::{Sku, SkuId, UserId, UserProfile};
use secrecy::SecretString;

static NAMESPACE_SEQ: AtomicU32 = AtomicU32::new(0);

/// Redis URL for live tests (configurable via environment).
#[must_use]
pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string())
}

/// State over a fresh in-process store, plus a handle to flip availability.
#[must_use]
pub fn memory_state() -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (AppState::new(Arc::clone(&store), Keys::default()), store)
}

/// State over a live Redis, scoped to a namespace no other test uses.
///
/// # Panics
///
/// Panics if Redis cannot be reached.
pub async fn redis_state() -> AppState {
    let config = QuickcartConfig {
        redis_url: SecretString::from(redis_url()),
        namespace: Some(unique_namespace()),
        command_timeout: Duration::from_secs(2),
        connect_timeout: Duration::from_secs(2),
    };
    let store = RedisStore::connect(&config)
        .await
        .expect("Failed to connect to Redis");
    AppState::new(store, config.keys())
}

fn unique_namespace() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!(
        "qc-test-{}-{nanos}-{}",
        std::process::id(),
        NAMESPACE_SEQ.fetch_add(1, Ordering::Relaxed)
    )
}

#[must_use]
pub fn user(id: &str) -> UserId {
    UserId::parse(id).expect("valid user id")
}

#[must_use]
pub fn sku(id: &str) -> SkuId {
    SkuId::parse(id).expect("valid sku id")
}

/// Seed user `1` Parker Perry, `sku123` AirPods $199.99 and `sku456`
/// Mechanical Keyboard $89.99.
///
/// # Panics
///
/// Panics if a write fails.
pub async fn seed_sample(state: &AppState) {
    UserRepository::new(state)
        .create(&user("1"), &UserProfile::new("Parker", "Perry"))
        .await
        .expect("Failed to create user");

    let catalog = CatalogRepository::new(state);
    catalog
        .upsert(
            &sku("sku123"),
            &Sku::new("AirPods", "199.99".parse().expect("price")),
        )
        .await
        .expect("Failed to add sku123");
    catalog
        .upsert(
            &sku("sku456"),
            &Sku::new("Mechanical Keyboard", "89.99".parse().expect("price")),
        )
        .await
        .expect("Failed to add sku456");
}
