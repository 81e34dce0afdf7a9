//! `qc sku` - maintain the catalog.

use quickcart::AppState;
use quickcart::db::CatalogRepository;
use quickcart_core::{Price, Sku, SkuId};
use tracing::info;

use crate::output::Output;

/// Create or update a SKU.
///
/// # Errors
///
/// Returns an error if the store write fails.
pub async fn add(
    state: &AppState,
    sku_id: &SkuId,
    name: String,
    price: Price,
) -> Result<(), Box<dyn std::error::Error>> {
    let sku = Sku::new(name, price);
    CatalogRepository::new(state).upsert(sku_id, &sku).await?;
    info!(sku_id = %sku_id, name = %sku.name, price = %sku.price, "Saved SKU");
    Ok(())
}

/// Show a SKU.
///
/// # Errors
///
/// Returns `NotFound` if the SKU is not in the catalog.
pub async fn get(
    state: &AppState,
    out: &Output,
    sku_id: &SkuId,
) -> Result<(), Box<dyn std::error::Error>> {
    let sku = CatalogRepository::new(state).require(sku_id).await?;

    if out.is_json() {
        out.json(&sku)?;
    } else {
        info!(sku_id = %sku_id, name = %sku.name, price = %sku.price, "SKU");
    }
    Ok(())
}
