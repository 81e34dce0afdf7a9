//! `qc cart` - add, remove, view and clear a user's cart.

use quickcart::AppState;
use quickcart::services::CartService;
use quickcart_core::{CartSummary, SkuId, UserId};
use serde_json::json;
use tracing::info;

use crate::output::Output;

/// Add `quantity` units of a SKU.
///
/// # Errors
///
/// Returns `InvalidArgument` for a non-positive quantity and `NotFound` if
/// the SKU is not in the catalog.
pub async fn add(
    state: &AppState,
    out: &Output,
    user_id: &UserId,
    sku_id: &SkuId,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = CartService::new(state)
        .add_item(user_id, sku_id, quantity)
        .await?;

    if out.is_json() {
        out.json(&json!({
            "user_id": user_id.as_str(),
            "sku_id": sku_id.as_str(),
            "quantity": now.get(),
        }))?;
    } else {
        info!(user_id = %user_id, sku_id = %sku_id, quantity = now.get(), "Added to cart");
    }
    Ok(())
}

/// Remove `quantity` units of a SKU. Removing everything drops the entry.
///
/// # Errors
///
/// Returns `InvalidArgument` for a non-positive quantity and `NotFound` if
/// the SKU is not in the cart.
pub async fn remove(
    state: &AppState,
    out: &Output,
    user_id: &UserId,
    sku_id: &SkuId,
    quantity: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let remaining = CartService::new(state)
        .remove_item(user_id, sku_id, quantity)
        .await?;

    if out.is_json() {
        out.json(&json!({
            "user_id": user_id.as_str(),
            "sku_id": sku_id.as_str(),
            "remaining": remaining,
        }))?;
    } else if remaining == 0 {
        info!(user_id = %user_id, sku_id = %sku_id, "Removed from cart");
    } else {
        info!(user_id = %user_id, sku_id = %sku_id, remaining, "Reduced quantity");
    }
    Ok(())
}

/// Show the priced cart.
///
/// # Errors
///
/// Returns `NotFound` if the cart references a SKU missing from the catalog.
pub async fn view(
    state: &AppState,
    out: &Output,
    user_id: &UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = CartService::new(state).view_cart(user_id).await?;

    if out.is_json() {
        out.json(&summary)?;
    } else {
        log_summary(user_id, &summary);
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the store delete fails.
pub async fn clear(state: &AppState, user_id: &UserId) -> Result<(), Box<dyn std::error::Error>> {
    if CartService::new(state).clear(user_id).await? {
        info!(user_id = %user_id, "Cart cleared");
    } else {
        info!(user_id = %user_id, "Cart was already empty");
    }
    Ok(())
}

/// Log a priced cart line by line.
pub fn log_summary(user_id: &UserId, summary: &CartSummary) {
    match summary {
        CartSummary::Empty => info!(user_id = %user_id, "Cart is empty"),
        CartSummary::Items { lines, total } => {
            match summary.item_count() {
                Some(items) => info!(user_id = %user_id, items, "Cart contents"),
                None => info!(user_id = %user_id, lines = lines.len(), "Cart contents"),
            }
            for line in lines {
                info!(
                    "- {} x{} @ {} each = {}",
                    line.name, line.quantity, line.unit_price, line.line_total
                );
            }
            info!(total = %total, "Total: {total}");
        }
    }
}
