//! Subcommand implementations.

pub mod cart;
pub mod demo;
pub mod list;
pub mod sku;
pub mod user;

use quickcart::AppState;
use tracing::info;

/// Round-trip a PING to the store.
///
/// # Errors
///
/// Returns an error if the store does not answer in time.
pub async fn ping(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    state.store().ping().await?;
    info!("PONG");
    Ok(())
}
