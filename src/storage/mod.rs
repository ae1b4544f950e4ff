//! Persistence for users and inventory

pub mod database;
pub mod models;

pub use database::{Database, DbSession};
pub use models::{InventoryItem, User};
