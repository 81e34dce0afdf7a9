//! Cart aggregate.
//!
//! A cart is the hash `cart:{user_id}` mapping SKU id to quantity. An entry
//! exists only while its quantity is positive: removal that would reach zero
//! deletes the field, and Redis drops the hash once its last field is gone.

use std::collections::BTreeMap;

use quickcart_core::{CartLine, CartSummary, Quantity, SkuId, UserId};
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{Error, Result};
use crate::state::AppState;

/// Cart operations for any user.
pub struct CartService<'a> {
    state: &'a AppState,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Add `quantity` units of a SKU to a user's cart.
    ///
    /// Returns the new quantity for that SKU.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `quantity` is zero or negative
    /// - `Error::NotFound` if the SKU is not in the catalog
    #[instrument(skip(self, user, sku), fields(user_id = %user, sku_id = %sku))]
    pub async fn add_item(&self, user: &UserId, sku: &SkuId, quantity: i64) -> Result<Quantity> {
        let quantity = Quantity::new(quantity)?;
        self.ensure_in_catalog(sku).await?;

        let key = self.state.keys().cart(user);
        let total = self
            .state
            .store()
            .hincr_by(&key, sku.as_str(), quantity.get())
            .await?;

        tracing::info!(added = quantity.get(), total, "Item added to cart");
        Quantity::new(total)
            .map_err(|_| Error::DataCorruption(format!("{key} holds {total} of {sku}")))
    }

    /// Remove up to `quantity` units of a SKU from a user's cart.
    ///
    /// If `quantity` covers everything in the cart the entry is deleted,
    /// however far it overshoots. The compare and the write run as a single
    /// store operation, so concurrent removals cannot leave a zero or
    /// negative entry behind.
    ///
    /// Returns the remaining quantity, `0` once the entry is gone.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `quantity` is zero or negative
    /// - `Error::NotFound` if the SKU is not in the catalog
    #[instrument(skip(self, user, sku), fields(user_id = %user, sku_id = %sku))]
    pub async fn remove_item(&self, user: &UserId, sku: &SkuId, quantity: i64) -> Result<i64> {
        let quantity = Quantity::new(quantity)?;
        self.ensure_in_catalog(sku).await?;

        let key = self.state.keys().cart(user);
        let remaining = self
            .state
            .store()
            .hdecr_or_remove(&key, sku.as_str(), quantity.get())
            .await?;

        if remaining == 0 {
            tracing::info!("Item removed from cart");
        } else {
            tracing::info!(removed = quantity.get(), remaining, "Item quantity decreased");
        }
        Ok(remaining)
    }

    /// Raw cart contents, ordered by SKU id.
    ///
    /// # Errors
    ///
    /// Returns `Error::DataCorruption` if a stored quantity is not a positive
    /// integer or a field name is empty.
    pub async fn contents(&self, user: &UserId) -> Result<BTreeMap<SkuId, Quantity>> {
        let key = self.state.keys().cart(user);
        let raw = self.state.store().hgetall(&key).await?;

        raw.into_iter()
            .map(|(field, value)| {
                let sku = SkuId::parse(field)
                    .map_err(|e| Error::DataCorruption(format!("{key}: {e}")))?;
                let quantity = value
                    .parse::<i64>()
                    .ok()
                    .and_then(|n| Quantity::new(n).ok())
                    .ok_or_else(|| {
                        Error::DataCorruption(format!("{key} holds {value:?} for {sku}"))
                    })?;
                Ok((sku, quantity))
            })
            .collect()
    }

    /// Price every line of a user's cart.
    ///
    /// Returns [`CartSummary::Empty`] when the cart has no entries.
    ///
    /// # Errors
    ///
    /// - `Error::NotFound` if a SKU in the cart is missing from the catalog
    /// - `Error::DataCorruption` if stored data is malformed or a total overflows
    #[instrument(skip(self, user), fields(user_id = %user))]
    pub async fn view_cart(&self, user: &UserId) -> Result<CartSummary> {
        let contents = self.contents(user).await?;
        if contents.is_empty() {
            tracing::debug!("Cart is empty");
            return Ok(CartSummary::Empty);
        }

        let catalog = CatalogRepository::new(self.state);
        let mut lines = Vec::with_capacity(contents.len());
        for (sku_id, quantity) in contents {
            let sku = catalog.get(&sku_id).await?.ok_or_else(|| {
                Error::NotFound(format!("SKU {sku_id} referenced by cart of user {user}"))
            })?;
            let line = CartLine::new(sku_id, sku, quantity)
                .ok_or_else(|| Error::DataCorruption("line total overflow".to_string()))?;
            lines.push(line);
        }

        let summary = CartSummary::from_lines(lines)
            .ok_or_else(|| Error::DataCorruption("cart total overflow".to_string()))?;
        if let Some(total) = summary.total() {
            tracing::debug!(lines = summary.lines().len(), %total, "Cart priced");
        }
        Ok(summary)
    }

    /// Empty a user's cart. Returns whether there was anything to remove.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` or `Error::Store` if the delete fails.
    pub async fn clear(&self, user: &UserId) -> Result<bool> {
        let key = self.state.keys().cart(user);
        Ok(self.state.store().del(&key).await?)
    }

    async fn ensure_in_catalog(&self, sku: &SkuId) -> Result<()> {
        if CatalogRepository::new(self.state).exists(sku).await? {
            Ok(())
        } else {
            Err(Error::NotFound(format!("SKU {sku}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use quickcart_core::Sku;

    use super::*;
    use crate::keys::Keys;
    use crate::store::{KeyValueStore, MemoryStore};

    fn user() -> UserId {
        UserId::parse("1").unwrap()
    }

    fn sku(id: &str) -> SkuId {
        SkuId::parse(id).unwrap()
    }

    async fn seeded() -> AppState {
        let state = AppState::new(MemoryStore::new(), Keys::default());
        let catalog = CatalogRepository::new(&state);
        catalog
            .upsert(&sku("sku123"), &Sku::new("AirPods", "199.99".parse().unwrap()))
            .await
            .unwrap();
        catalog
            .upsert(
                &sku("sku456"),
                &Sku::new("Mechanical Keyboard", "89.99".parse().unwrap()),
            )
            .await
            .unwrap();
        state
    }

    #[tokio::test]
    async fn test_add_accumulates() {
        let state = seeded().await;
        let cart = CartService::new(&state);

        assert_eq!(cart.add_item(&user(), &sku("sku123"), 2).await.unwrap().get(), 2);
        assert_eq!(cart.add_item(&user(), &sku("sku123"), 3).await.unwrap().get(), 5);
    }

    #[tokio::test]
    async fn test_split_adds_match_single_add() {
        let split = seeded().await;
        let single = seeded().await;

        let cart = CartService::new(&split);
        cart.add_item(&user(), &sku("sku456"), 4).await.unwrap();
        cart.add_item(&user(), &sku("sku456"), 7).await.unwrap();

        CartService::new(&single)
            .add_item(&user(), &sku("sku456"), 11)
            .await
            .unwrap();

        assert_eq!(
            CartService::new(&split).contents(&user()).await.unwrap(),
            CartService::new(&single).contents(&user()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_add_rejects_non_positive_quantity() {
        let state = seeded().await;
        let cart = CartService::new(&state);

        for bad in [0, -1, i64::MIN] {
            let err = cart.add_item(&user(), &sku("sku123"), bad).await.unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "{bad}");
        }
        assert!(cart.contents(&user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_unknown_sku_is_not_found() {
        let state = seeded().await;
        let err = CartService::new(&state)
            .add_item(&user(), &sku("ghost"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_decrements_then_deletes() {
        let state = seeded().await;
        let cart = CartService::new(&state);
        cart.add_item(&user(), &sku("sku123"), 3).await.unwrap();

        assert_eq!(cart.remove_item(&user(), &sku("sku123"), 1).await.unwrap(), 2);
        assert_eq!(cart.remove_item(&user(), &sku("sku123"), 2).await.unwrap(), 0);
        assert!(cart.contents(&user()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_overshoot_deletes_entry() {
        let state = seeded().await;
        let cart = CartService::new(&state);
        cart.add_item(&user(), &sku("sku123"), 2).await.unwrap();
        cart.add_item(&user(), &sku("sku456"), 1).await.unwrap();

        assert_eq!(
            cart.remove_item(&user(), &sku("sku123"), 1_000_000).await.unwrap(),
            0
        );

        let contents = cart.contents(&user()).await.unwrap();
        assert!(!contents.contains_key(&sku("sku123")));
        assert_eq!(contents.get(&sku("sku456")), Some(&Quantity::ONE));
    }

    #[tokio::test]
    async fn test_remove_absent_entry_is_noop() {
        let state = seeded().await;
        let cart = CartService::new(&state);
        assert_eq!(cart.remove_item(&user(), &sku("sku123"), 1).await.unwrap(), 0);
        assert!(matches!(cart.view_cart(&user()).await.unwrap(), CartSummary::Empty));
    }

    #[tokio::test]
    async fn test_view_empty_cart() {
        let state = seeded().await;
        let summary = CartService::new(&state).view_cart(&user()).await.unwrap();
        assert_eq!(summary, CartSummary::Empty);
    }

    #[tokio::test]
    async fn test_view_prices_lines() {
        let state = seeded().await;
        let cart = CartService::new(&state);
        cart.add_item(&user(), &sku("sku123"), 2).await.unwrap();
        cart.add_item(&user(), &sku("sku456"), 1).await.unwrap();

        let summary = cart.view_cart(&user()).await.unwrap();
        let lines = summary.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "AirPods");
        assert_eq!(lines[0].line_total.to_string(), "$399.98");
        assert_eq!(lines[1].name, "Mechanical Keyboard");
        assert_eq!(summary.total(), Some("489.97".parse().unwrap()));
    }

    #[tokio::test]
    async fn test_view_with_orphaned_sku_is_not_found() {
        let state = seeded().await;
        state
            .store()
            .hincr_by("cart:1", "discontinued", 1)
            .await
            .unwrap();

        let err = CartService::new(&state).view_cart(&user()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m.contains("discontinued")));
    }

    #[tokio::test]
    async fn test_remove_orphaned_sku_is_not_found() {
        let state = seeded().await;
        state
            .store()
            .hincr_by("cart:1", "discontinued", 1)
            .await
            .unwrap();

        let err = CartService::new(&state)
            .remove_item(&user(), &sku("discontinued"), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_zero_quantity_in_store_is_corruption() {
        let state = seeded().await;
        state
            .store()
            .hset_multiple("cart:1", &[("sku123", "0".to_string())])
            .await
            .unwrap();

        let err = CartService::new(&state).view_cart(&user()).await.unwrap_err();
        assert!(matches!(err, Error::DataCorruption(_)));
    }

    #[tokio::test]
    async fn test_clear() {
        let state = seeded().await;
        let cart = CartService::new(&state);
        cart.add_item(&user(), &sku("sku123"), 1).await.unwrap();

        assert!(cart.clear(&user()).await.unwrap());
        assert!(!cart.clear(&user()).await.unwrap());
        assert_eq!(cart.view_cart(&user()).await.unwrap(), CartSummary::Empty);
    }

    #[tokio::test]
    async fn test_unavailable_store_surfaces() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), Keys::default());
        store.set_available(false);

        let err = CartService::new(&state).view_cart(&user()).await.unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }
}
