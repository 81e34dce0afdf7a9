//! Core types for Quickcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod quantity;
pub mod record;

pub use cart::{CartLine, CartSummary};
pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use record::{Sku, UserProfile};
