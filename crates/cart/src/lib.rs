//! Quickcart - shopping cart, catalog and bulk list services over Redis.
//!
//! # Architecture
//!
//! - The store is an injected [`KeyValueStore`] handle carried by [`AppState`];
//!   there is no process-wide connection
//! - [`RedisStore`] talks to Redis through a reconnecting `ConnectionManager`
//! - [`MemoryStore`] implements the same contract in-process for tests
//! - Repositories ([`db`]) map records to store hashes; services ([`services`])
//!   hold the cart and sequence logic
//!
//! # Example
//!
//! ```rust,ignore
//! use quickcart::{AppState, QuickcartConfig, RedisStore};
//! use quickcart::services::CartService;
//!
//! let config = QuickcartConfig::from_env()?;
//! let store = RedisStore::connect(&config).await?;
//! let state = AppState::new(store, config.keys());
//!
//! let cart = CartService::new(&state);
//! cart.add_item(&user_id, &sku_id, 2).await?;
//! let summary = cart.view_cart(&user_id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod keys;
pub mod services;
pub mod state;
pub mod store;

pub use config::{ConfigError, QuickcartConfig};
pub use error::{Error, Result};
pub use keys::Keys;
pub use state::AppState;
pub use store::{KeyValueStore, MemoryStore, RedisStore, StoreError};
