//! Store key layout.
//!
//! | Record | Key | Type |
//! |--------|-----|------|
//! | User | `user:{user_id}` | hash |
//! | SKU | `sku:{sku_id}` | hash |
//! | Cart | `cart:{user_id}` | hash of `sku_id -> quantity` |
//! | Sequence | `{name}` | list |
//!
//! With a namespace every key is prefixed as `{namespace}:{key}`.

use quickcart_core::{SkuId, UserId};

/// Builds store keys, applying the optional namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keys {
    namespace: Option<String>,
}

impl Keys {
    #[must_use]
    pub const fn new(namespace: Option<String>) -> Self {
        Self { namespace }
    }

    #[must_use]
    pub fn user(&self, id: &UserId) -> String {
        self.scoped(&format!("user:{id}"))
    }

    #[must_use]
    pub fn sku(&self, id: &SkuId) -> String {
        self.scoped(&format!("sku:{id}"))
    }

    #[must_use]
    pub fn cart(&self, user: &UserId) -> String {
        self.scoped(&format!("cart:{user}"))
    }

    #[must_use]
    pub fn list(&self, name: &str) -> String {
        self.scoped(name)
    }

    fn scoped(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}:{key}"),
            None => key.to_owned(),
        }
    }
}
