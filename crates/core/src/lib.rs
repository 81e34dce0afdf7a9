//! Quickcart Core - Shared types library.
//!
//! This crate provides common types used across all Quickcart components:
//! - `quickcart` - Cart, catalog and sequence services over a key-value store
//! - `cli` - Command-line front end (`qc`)
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no store access,
//! no network clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, quantities, and
//!   the records and views built from them

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
