//! Bulk sequence loader.
//!
//! `load_sequence(name, n)` rebuilds the list `name` from `1..=n`, prepending
//! each value, so the stored order is `n, n-1, ..., 1`. The clear and the
//! prepends reach the store as one atomic batch.

use tracing::instrument;

use crate::error::{Error, Result};
use crate::state::AppState;

/// Largest `n` accepted by [`SequenceLoader::load_sequence`].
///
/// The values are built in memory before the batch is sent.
pub const MAX_SEQUENCE_LEN: i64 = 10_000_000;

/// Loads and reads integer sequences stored as lists.
pub struct SequenceLoader<'a> {
    state: &'a AppState,
}

impl<'a> SequenceLoader<'a> {
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Replace the list `name` with `1..=n`, prepended one by one.
    ///
    /// `n <= 0` leaves the list empty. Returns the number of values stored.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `name` is empty or `n` exceeds
    ///   [`MAX_SEQUENCE_LEN`]
    /// - `Error::StoreUnavailable` or `Error::Store` if the batch fails
    #[instrument(skip(self))]
    pub async fn load_sequence(&self, name: &str, n: i64) -> Result<usize> {
        let key = self.list_key(name)?;
        if n > MAX_SEQUENCE_LEN {
            return Err(Error::InvalidArgument(format!(
                "sequence length {n} exceeds the maximum of {MAX_SEQUENCE_LEN}"
            )));
        }
        let values: Vec<i64> = if n > 0 { (1..=n).collect() } else { Vec::new() };

        self.state
            .store()
            .replace_list_prepending(&key, &values)
            .await?;

        tracing::info!(count = values.len(), "Sequence loaded");
        Ok(values.len())
    }

    /// Read the inclusive range `start..=end` in stored order.
    ///
    /// Negative indices count back from the tail, so `end = -1` reads to the
    /// end of the sequence.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidArgument` if `name` is empty
    /// - `Error::DataCorruption` if a stored value is not an integer
    pub async fn read_range(&self, name: &str, start: i64, end: i64) -> Result<Vec<i64>> {
        let key = self.list_key(name)?;
        self.state
            .store()
            .lrange(&key, start, end)
            .await?
            .into_iter()
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| Error::DataCorruption(format!("{key} holds non-integer {raw:?}")))
            })
            .collect()
    }

    /// Number of values stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `name` is empty.
    pub async fn len(&self, name: &str) -> Result<u64> {
        let key = self.list_key(name)?;
        Ok(self.state.store().llen(&key).await?)
    }

    fn list_key(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "sequence name cannot be empty".to_string(),
            ));
        }
        Ok(self.state.keys().list(name))
    }
}
