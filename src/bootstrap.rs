//! Startup seeding of the initial user

use crate::auth::hash_password;
use crate::config::BootstrapUser;
use crate::error::{Result, StockError};
use crate::storage::Database;

/// Creates the bootstrap user unless one with that name already exists.
/// Returns whether a user was created. An existing user is never touched.
pub async fn ensure_bootstrap_user(db: &Database, user: &BootstrapUser) -> Result<bool> {
    {
        let mut session = db.session().await?;
        if session.find_user_by_username(user.username.trim()).await?.is_some() {
            log::info!("Bootstrap user '{}' already present", user.username.trim());
            return Ok(false);
        }
    }

    let password = user.password.clone();
    let digest = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| StockError::SystemError(format!("Password hashing task failed: {}", e)))??;

    match db.create_user(&user.username, &digest).await {
        Ok(id) => {
            log::info!("Created bootstrap user '{}' (id {})", user.username.trim(), id);
            Ok(true)
        }
        // Lost a race with another instance seeding the same store
        Err(StockError::UserExists(_)) => Ok(false),
        Err(e) => Err(e),
    }
}
