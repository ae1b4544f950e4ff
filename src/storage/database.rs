//! SQLite-backed credential and inventory store
//!
//! Tables:
//! - `user`: id, username (unique), hashed_password
//! - `inv`: id, item_name, quantity
//!
//! Request handlers never touch the pool directly. They open one
//! [`DbSession`] per request and the connection goes back to the pool
//! when the session is dropped, whichever way the handler exits.

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool};
use std::str::FromStr;

use super::models::{InventoryItem, User};
use crate::error::{Result, StockError};

const CREATE_USER_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS "user" (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        username        VARCHAR(255) NOT NULL UNIQUE,
        hashed_password VARCHAR(255) NOT NULL
    )
"#;

const CREATE_INV_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS inv (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        item_name VARCHAR(255) NOT NULL,
        quantity  INTEGER NOT NULL CHECK (quantity >= 0)
    )
"#;

/// Shared handle on the connection pool
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database behind `url`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create both tables if they do not exist yet
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(CREATE_USER_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INV_TABLE).execute(&self.pool).await?;
        log::debug!("Store schema ready");
        Ok(())
    }

    /// Check a connection out of the pool for the duration of one request
    pub async fn session(&self) -> Result<DbSession> {
        let conn = self.pool.acquire().await?;
        log::trace!("Store connection acquired");
        Ok(DbSession { conn })
    }

    /// Register a user with an already hashed password. Returns the row id.
    pub async fn create_user(&self, username: &str, hashed_password: &str) -> Result<i64> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StockError::ValidationError(
                "Username cannot be empty".to_string(),
            ));
        }

        let result = sqlx::query(r#"INSERT INTO "user" (username, hashed_password) VALUES (?, ?)"#)
            .bind(username)
            .bind(hashed_password)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StockError::UserExists(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add an inventory row. Returns the row id.
    pub async fn add_item(&self, item_name: &str, quantity: i64) -> Result<i64> {
        if quantity < 0 {
            return Err(StockError::ValidationError(format!(
                "Quantity cannot be negative: {}",
                quantity
            )));
        }

        let done = sqlx::query("INSERT INTO inv (item_name, quantity) VALUES (?, ?)")
            .bind(item_name)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        Ok(done.last_insert_rowid())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// One exclusively owned store connection. Dropping it hands the
/// connection back to the pool.
pub struct DbSession {
    conn: PoolConnection<Sqlite>,
}

impl DbSession {
    pub async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, username, hashed_password FROM "user" WHERE username = ?"#,
        )
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(user)
    }

    /// Every inventory row, in insertion order
    pub async fn list_inventory(&mut self) -> Result<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, item_name, quantity FROM inv ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(items)
    }
}
