//! Request handlers for the API endpoints

pub mod auth;
pub mod inventory;
pub mod rejection;
pub mod token;

pub use auth::{authenticate, extract_bearer_token};
pub use rejection::handle_rejection;
