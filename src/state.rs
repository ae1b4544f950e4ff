//! Shared, immutable per-process state handed to every request

use std::sync::Arc;

use crate::auth::TokenManager;
use crate::config::ServerConfig;
use crate::storage::Database;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenManager>,
}

impl AppState {
    pub fn new(db: Database, tokens: TokenManager) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
        }
    }

    pub fn from_config(db: Database, config: &ServerConfig) -> Self {
        Self::new(db, TokenManager::from_config(config))
    }
}
