//! Gated read of the whole inventory

use warp::{Rejection, Reply};

use super::auth::authenticate;
use crate::error::Result;
use crate::state::AppState;
use crate::storage::InventoryItem;

/// Warp entry point for `GET /inv`
pub async fn list_inventory(
    auth_header: Option<String>,
    state: AppState,
) -> std::result::Result<impl Reply, Rejection> {
    let items = load_inventory(auth_header.as_deref(), &state)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&items))
}

async fn load_inventory(auth_header: Option<&str>, state: &AppState) -> Result<Vec<InventoryItem>> {
    let mut session = state.db.session().await?;
    let user = authenticate(auth_header, &state.tokens, &mut session).await?;

    // Inventory is shared, every authenticated user sees every row
    let items = session.list_inventory().await?;
    log::debug!("Returning {} inventory rows to user id {}", items.len(), user.id);
    Ok(items)
}
