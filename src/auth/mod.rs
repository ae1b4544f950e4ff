//! Authentication: password hashing and token issuance/validation

pub mod password;
pub mod token;

// Re-export main components
pub use password::{hash_password, verify_or_dummy, verify_password};
pub use token::{Claims, TokenManager};
