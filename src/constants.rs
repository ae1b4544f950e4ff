// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

// Route segments
pub const TOKEN_PATH: &str = "token";
pub const INV_PATH: &str = "inv";
pub const HEALTH_PATH: &str = "health";

// Store configuration constants
pub const DEFAULT_DATABASE_URL: &str = "sqlite://rusty_stock.db";
pub const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

// Token configuration constants
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 30;
pub const TOKEN_TYPE: &str = "bearer";

/// Upper bound for the credential form body
pub const MAX_FORM_BYTES: u64 = 4 * 1024;
