//! User repository.

use quickcart_core::{UserId, UserProfile};
use tracing::instrument;

use super::take_field;
use crate::error::Result;
use crate::state::AppState;

/// Repository for user profile records.
pub struct UserRepository<'a> {
    state: &'a AppState,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create or overwrite a user profile.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` or `Error::Store` if the write fails.
    #[instrument(skip(self, profile), fields(user_id = %id))]
    pub async fn create(&self, id: &UserId, profile: &UserProfile) -> Result<()> {
        let key = self.state.keys().user(id);
        self.state
            .store()
            .hset_multiple(
                &key,
                &[
                    ("first_name", profile.first_name.clone()),
                    ("last_name", profile.last_name.clone()),
                ],
            )
            .await?;
        tracing::info!("User created");
        Ok(())
    }

    /// Get a user profile by ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::DataCorruption` if the stored hash lacks a name field.
    pub async fn get(&self, id: &UserId) -> Result<Option<UserProfile>> {
        let key = self.state.keys().user(id);
        let mut hash = self.state.store().hgetall(&key).await?;
        if hash.is_empty() {
            return Ok(None);
        }

        Ok(Some(UserProfile {
            first_name: take_field(&mut hash, &key, "first_name")?,
            last_name: take_field(&mut hash, &key, "last_name")?,
        }))
    }
}
