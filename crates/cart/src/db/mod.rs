//! Record repositories over the key-value store.
//!
//! # Records
//!
//! - `user:{id}` - profile hash (`first_name`, `last_name`)
//! - `sku:{id}` - catalog hash (`name`, `price`)
//!
//! Repositories return `Option` for missing records and leave it to callers
//! to decide whether absence is an error.

pub mod catalog;
pub mod users;

pub use catalog::CatalogRepository;
pub use users::UserRepository;

use std::collections::HashMap;

use crate::error::Error;

/// Take a required field out of a stored hash.
fn take_field(
    hash: &mut HashMap<String, String>,
    key: &str,
    field: &str,
) -> Result<String, Error> {
    hash.remove(field)
        .ok_or_else(|| Error::DataCorruption(format!("{key} is missing field `{field}`")))
}
