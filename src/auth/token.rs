use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::{Result, StockError};

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiration time (as UTC timestamp)
    pub exp: i64,
    /// Issued at (as UTC timestamp)
    pub iat: i64,
}

impl Claims {
    /// Creates claims for a subject valid for `ttl_secs` from `issued_at`
    pub fn new(subject: &str, issued_at: i64, ttl_secs: i64) -> Self {
        Self {
            sub: Some(subject.to_string()),
            exp: issued_at.saturating_add(ttl_secs),
            iat: issued_at,
        }
    }

    /// The subject, if present and non-empty
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().filter(|s| !s.is_empty())
    }
}

/// Issues and validates signed access tokens
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenManager {
    /// Creates a new token manager with a secret, an HMAC algorithm and a token lifetime
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Self {
        let mut validation = Validation::new(algorithm);
        // Expiry is exact, a token is dead the second its TTL runs out
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            header: Header::new(algorithm),
            validation,
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_algorithm, config.token_ttl)
    }

    /// Issues a token for the given username, expiring after the configured TTL
    pub fn issue(&self, username: &str) -> Result<String> {
        let claims = Claims::new(username, Utc::now().timestamp(), self.ttl_secs);
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| StockError::AuthError(format!("Failed to generate token: {}", e)))
    }

    /// Validates and decodes a token.
    ///
    /// Bad signature, wrong algorithm, expiry and missing claims all come back
    /// as the same `Unauthorized`.
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                StockError::Unauthorized
            })
    }
}
