//! `qc list` - rebuild and read bulk integer lists.

use quickcart::AppState;
use quickcart::services::SequenceLoader;
use serde_json::json;
use tracing::info;

use crate::output::Output;

/// Replace list `name` with `1..=n`.
///
/// # Errors
///
/// Returns an error if the name is empty or the batch fails.
pub async fn load(
    state: &AppState,
    out: &Output,
    name: &str,
    n: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let count = SequenceLoader::new(state).load_sequence(name, n).await?;

    if out.is_json() {
        out.json(&json!({ "name": name, "count": count }))?;
    } else {
        info!(list = %name, count, "Inserted 1 to {n} into '{name}'");
    }
    Ok(())
}

/// Read `start..=end` of list `name`.
///
/// # Errors
///
/// Returns an error if the name is empty or a stored value is not an integer.
pub async fn read(
    state: &AppState,
    out: &Output,
    name: &str,
    start: i64,
    end: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let values = SequenceLoader::new(state)
        .read_range(name, start, end)
        .await?;

    if out.is_json() {
        out.json(&values)?;
    } else {
        info!(list = %name, start, end, count = values.len(), "Values: {values:?}");
    }
    Ok(())
}
