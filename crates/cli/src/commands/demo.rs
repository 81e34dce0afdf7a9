//! `qc demo` - the sample shopping flow.
//!
//! Creates user `1`, two SKUs, fills and trims the cart, then rebuilds
//! `biglist` with 10,000 values and reads the first ten back. Existing data
//! under those keys is overwritten.

use quickcart::AppState;
use quickcart::db::{CatalogRepository, UserRepository};
use quickcart::services::{CartService, SequenceLoader};
use quickcart_core::{Price, Sku, SkuId, UserId, UserProfile};
use serde_json::json;
use tracing::info;

use super::cart::log_summary;
use crate::output::Output;

const BIGLIST: &str = "biglist";
const BIGLIST_LEN: i64 = 10_000;

/// Run the sample flow.
///
/// # Errors
///
/// Returns the first store or validation error encountered.
pub async fn run(state: &AppState, out: &Output) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = UserId::parse("1")?;
    let airpods = SkuId::parse("sku123")?;
    let keyboard = SkuId::parse("sku456")?;

    UserRepository::new(state)
        .create(&user_id, &UserProfile::new("Parker", "Perry"))
        .await?;

    let catalog = CatalogRepository::new(state);
    catalog
        .upsert(&airpods, &Sku::new("AirPods", "199.99".parse::<Price>()?))
        .await?;
    catalog
        .upsert(
            &keyboard,
            &Sku::new("Mechanical Keyboard", "89.99".parse::<Price>()?),
        )
        .await?;

    let cart = CartService::new(state);
    cart.clear(&user_id).await?;
    cart.add_item(&user_id, &airpods, 2).await?;
    cart.add_item(&user_id, &keyboard, 1).await?;

    let before = cart.view_cart(&user_id).await?;
    log_summary(&user_id, &before);

    cart.remove_item(&user_id, &airpods, 1).await?;
    let after = cart.view_cart(&user_id).await?;
    log_summary(&user_id, &after);

    let user = UserRepository::new(state)
        .get(&user_id)
        .await?
        .ok_or_else(|| quickcart::Error::NotFound(format!("user {user_id}")))?;
    info!(user_id = %user_id, name = %user.full_name(), "User info");

    let loader = SequenceLoader::new(state);
    let count = loader.load_sequence(BIGLIST, BIGLIST_LEN).await?;
    let head = loader.read_range(BIGLIST, 0, 9).await?;
    info!(list = BIGLIST, count, "First 10 values: {head:?}");

    if out.is_json() {
        out.json(&json!({
            "cart_before": before,
            "cart_after": after,
            "user": user,
            "biglist_len": count,
            "biglist_head": head,
        }))?;
    }
    Ok(())
}
