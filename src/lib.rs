//! Rusty Stock - a token-authenticated inventory API implemented in Rust
//!
//! Clients trade a username and password for a signed, short-lived access
//! token at `POST /token`, then present it as a bearer credential to read
//! the inventory at `GET /inv`.

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod security;
pub mod state;
pub mod storage;

// Re-export main components
pub use config::*;
pub use constants::*;
pub use state::AppState;
