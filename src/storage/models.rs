//! Rows of the credential and inventory tables

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored user. The digest never leaves the server, so this is not `Serialize`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub hashed_password: String,
}

/// A named quantity of stock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct InventoryItem {
    pub id: i64,
    pub item_name: String,
    pub quantity: i64,
}
