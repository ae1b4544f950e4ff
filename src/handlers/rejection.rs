//! Turns rejections into JSON error responses
//!
//! This is the only place errors become status codes. Auth failures carry
//! the bearer challenge; server faults are logged and answered without detail.

use serde::Serialize;
use std::convert::Infallible;
use warp::http::header::WWW_AUTHENTICATE;
use warp::http::{HeaderValue, StatusCode};
use warp::reply::Response;
use warp::{Rejection, Reply};

use crate::error::StockError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

fn error_response(status: StatusCode, detail: &str, challenge: bool) -> Response {
    let mut response = warp::reply::json(&ErrorBody {
        detail: detail.to_string(),
    })
    .into_response();
    *response.status_mut() = status;
    if challenge {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    response
}

fn stock_error_response(err: &StockError) -> Response {
    match err {
        StockError::InvalidCredentials | StockError::Unauthorized => {
            error_response(StatusCode::UNAUTHORIZED, &err.to_string(), true)
        }
        other => {
            log::error!("Request failed: {}", other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                false,
            )
        }
    }
}

/// Recovery filter for the whole API
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let response = if let Some(stock_err) = err.find::<StockError>() {
        stock_error_response(stock_err)
    } else if err.is_not_found() {
        error_response(StatusCode::NOT_FOUND, "Not Found", false)
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        error_response(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string(), false)
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected an application/x-www-form-urlencoded body",
            false,
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large", false)
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        error_response(StatusCode::LENGTH_REQUIRED, "Content-Length required", false)
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed", false)
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            false,
        )
    };

    Ok(response)
}
