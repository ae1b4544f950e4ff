//! Credential exchange: username + password for an access token

use serde::{Deserialize, Serialize};
use warp::{Rejection, Reply};

use crate::auth::verify_or_dummy;
use crate::constants::TOKEN_TYPE;
use crate::error::{Result, StockError};
use crate::state::AppState;

/// OAuth2 password-grant style form. Extra fields such as `grant_type`
/// and `scope` are accepted and ignored.
#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Warp entry point for `POST /token`
pub async fn issue_token(form: TokenRequest, state: AppState) -> std::result::Result<impl Reply, Rejection> {
    let response = exchange_credentials(form, &state)
        .await
        .map_err(warp::reject::custom)?;
    Ok(warp::reply::json(&response))
}

async fn exchange_credentials(form: TokenRequest, state: &AppState) -> Result<TokenResponse> {
    let user = {
        let mut session = state.db.session().await?;
        session.find_user_by_username(&form.username).await?
    };

    let digest = user.as_ref().map(|u| u.hashed_password.clone());
    let password = form.password;
    let verified = tokio::task::spawn_blocking(move || verify_or_dummy(&password, digest.as_deref()))
        .await
        .map_err(|e| StockError::SystemError(format!("Password verification task failed: {}", e)))?;

    let user = match user {
        Some(user) if verified => user,
        _ => {
            log::debug!("Credential exchange rejected");
            return Err(StockError::InvalidCredentials);
        }
    };

    let access_token = state.tokens.issue(&user.username)?;
    log::info!("Issued access token for user id {}", user.id);

    Ok(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    })
}
