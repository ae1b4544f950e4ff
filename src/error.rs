use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum StockError {
    // Auth errors
    InvalidCredentials,
    Unauthorized,
    AuthError(String),

    // Storage errors
    StorageError(String),
    UserExists(String),

    // Validation errors
    ValidationError(String),

    // System errors
    SystemError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for StockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "Incorrect username or password"),
            Self::Unauthorized => write!(f, "Could not validate credentials"),
            Self::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::UserExists(name) => write!(f, "User already exists: {}", name),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::SystemError(msg) => write!(f, "System error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for StockError {}

impl From<sqlx::Error> for StockError {
    fn from(err: sqlx::Error) -> Self {
        StockError::StorageError(err.to_string())
    }
}

// Lets handlers hand errors straight to warp's rejection machinery
impl warp::reject::Reject for StockError {}

// Generic result type for rusty-stock
pub type Result<T> = std::result::Result<T, StockError>;
