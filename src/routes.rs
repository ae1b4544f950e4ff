//! HTTP surface: route table for the API

use std::convert::Infallible;
use warp::http::header::AUTHORIZATION;
use warp::http::HeaderMap;
use warp::{Filter, Reply};

use crate::constants::{HEALTH_PATH, INV_PATH, MAX_FORM_BYTES, TOKEN_PATH};
use crate::handlers::{inventory, rejection, token};
use crate::security::with_api_security_headers;
use crate::state::AppState;

/// All routes, recovered and wrapped with security headers and request logging
pub fn api(state: AppState) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let token_route = warp::path(TOKEN_PATH)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_FORM_BYTES))
        .and(warp::body::form::<token::TokenRequest>())
        .and(with_state(state.clone()))
        .and_then(token::issue_token);

    let inv_route = warp::path(INV_PATH)
        .and(warp::path::end())
        .and(warp::get())
        .and(authorization_header())
        .and(with_state(state))
        .and_then(inventory::list_inventory);

    let health_route = warp::path(HEALTH_PATH)
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "OK");

    token_route
        .or(inv_route)
        .or(health_route)
        .recover(rejection::handle_rejection)
        .map(with_api_security_headers)
        .with(warp::log("rusty_stock::api"))
}

// Helper function to include shared state in request
fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

// A non-UTF-8 header is treated as absent so it fails the gate like any other bad credential
fn authorization_header() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::header::headers_cloned().map(|headers: HeaderMap| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    })
}
