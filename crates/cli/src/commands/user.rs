//! `qc user` - create and show user profiles.

use quickcart::AppState;
use quickcart::db::UserRepository;
use quickcart_core::{UserId, UserProfile};
use tracing::info;

use crate::output::Output;

/// Create or overwrite a user profile.
///
/// # Errors
///
/// Returns an error if the store write fails.
pub async fn create(
    state: &AppState,
    user_id: &UserId,
    first_name: String,
    last_name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = UserProfile::new(first_name, last_name);
    UserRepository::new(state).create(user_id, &profile).await?;
    info!(user_id = %user_id, name = %profile.full_name(), "Created user");
    Ok(())
}

/// Show a user profile.
///
/// # Errors
///
/// Returns `NotFound` if the user does not exist.
pub async fn get(
    state: &AppState,
    out: &Output,
    user_id: &UserId,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = UserRepository::new(state)
        .get(user_id)
        .await?
        .ok_or_else(|| quickcart::Error::NotFound(format!("user {user_id}")))?;

    if out.is_json() {
        out.json(&profile)?;
    } else {
        info!(
            user_id = %user_id,
            first_name = %profile.first_name,
            last_name = %profile.last_name,
            "User info"
        );
    }
    Ok(())
}
