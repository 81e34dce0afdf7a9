//! Business logic over the repositories.
//!
//! - [`CartService`] - per-user cart: add, remove, view with pricing
//! - [`SequenceLoader`] - bulk list rebuild and range reads

pub mod cart;
pub mod sequence;

pub use cart::CartService;
pub use sequence::{MAX_SEQUENCE_LEN, SequenceLoader};
