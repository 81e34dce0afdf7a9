//! Records kept in the user and catalog stores.

use serde::{Deserialize, Serialize};

use super::Price;

/// A user profile, stored under `user:{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    /// Create a profile from first and last name.
    #[must_use]
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A catalog entry, stored under `sku:{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sku {
    /// Display name shown in cart listings.
    pub name: String,
    /// Unit price.
    pub price: Price,
}

impl Sku {
    /// Create a catalog entry.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}
