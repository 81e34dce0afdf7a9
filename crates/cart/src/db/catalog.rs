//! Catalog (SKU) repository.

use quickcart_core::{Price, Sku, SkuId};
use tracing::instrument;

use super::take_field;
use crate::error::{Error, Result};
use crate::state::AppState;

/// Repository for SKU records.
pub struct CatalogRepository<'a> {
    state: &'a AppState,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Insert or update a SKU. The price is stored in canonical decimal form.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` or `Error::Store` if the write fails.
    #[instrument(skip(self, sku), fields(sku_id = %id, price = %sku.price))]
    pub async fn upsert(&self, id: &SkuId, sku: &Sku) -> Result<()> {
        let key = self.state.keys().sku(id);
        self.state
            .store()
            .hset_multiple(
                &key,
                &[
                    ("name", sku.name.clone()),
                    ("price", sku.price.to_canonical_string()),
                ],
            )
            .await?;
        tracing::info!("SKU saved");
        Ok(())
    }

    /// Get a SKU by ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::DataCorruption` if a field is missing or the stored
    /// price is not a non-negative decimal.
    pub async fn get(&self, id: &SkuId) -> Result<Option<Sku>> {
        let key = self.state.keys().sku(id);
        let mut hash = self.state.store().hgetall(&key).await?;
        if hash.is_empty() {
            return Ok(None);
        }

        let name = take_field(&mut hash, &key, "name")?;
        let raw_price = take_field(&mut hash, &key, "price")?;
        let price = raw_price
            .parse::<Price>()
            .map_err(|e| Error::DataCorruption(format!("{key}: {e}")))?;

        Ok(Some(Sku { name, price }))
    }

    /// Get a SKU that must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the SKU is not in the catalog.
    pub async fn require(&self, id: &SkuId) -> Result<Sku> {
        self.get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("SKU {id}")))
    }

    /// Whether a SKU is in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` or `Error::Store` if the lookup fails.
    pub async fn exists(&self, id: &SkuId) -> Result<bool> {
        let key = self.state.keys().sku(id);
        Ok(self.state.store().exists(&key).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::keys::Keys;
    use crate::store::{KeyValueStore, MemoryStore};

    fn state() -> AppState {
        AppState::new(MemoryStore::new(), Keys::default())
    }

    #[tokio::test]
    async fn test_upsert_then_get() {
        let state = state();
        let repo = CatalogRepository::new(&state);
        let id = SkuId::parse("sku123").unwrap();

        repo.upsert(&id, &Sku::new("AirPods", "199.99".parse().unwrap()))
            .await
            .unwrap();

        let sku = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(sku.name, "AirPods");
        assert_eq!(sku.price.to_string(), "$199.99");
        assert!(repo.exists(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_price_stored_as_canonical_string() {
        let state = state();
        let id = SkuId::parse("sku456").unwrap();
        CatalogRepository::new(&state)
            .upsert(&id, &Sku::new("Keyboard", "89.990".parse().unwrap()))
            .await
            .unwrap();

        let raw = state.store().hget("sku:sku456", "price").await.unwrap();
        assert_eq!(raw.as_deref(), Some("89.99"));
    }

    #[tokio::test]
    async fn test_require_missing_is_not_found() {
        let state = state();
        let err = CatalogRepository::new(&state)
            .require(&SkuId::parse("nope").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_bad_stored_price_is_corruption() {
        let state = state();
        state
            .store()
            .hset_multiple(
                "sku:bad",
                &[("name", "Broken".to_string()), ("price", "free".to_string())],
            )
            .await
            .unwrap();

        let err = CatalogRepository::new(&state)
            .get(&SkuId::parse("bad").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DataCorruption(_)));
    }
}
