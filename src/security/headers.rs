//! Security headers for HTTP responses
//!
//! The API only ever returns JSON (or a plain health string), so every
//! response gets the same strict set.

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; frame-ancestors 'none';";

const PERMISSIONS_POLICY: &str = "geolocation=(), microphone=(), camera=(), payment=(), usb=(), magnetometer=(), gyroscope=(), accelerometer=()";

/// Wrap a reply with strict security headers for API endpoints
pub fn with_api_security_headers<T: warp::Reply>(reply: T) -> impl warp::Reply {
    let reply = warp::reply::with_header(reply, "X-Frame-Options", "DENY");
    let reply = warp::reply::with_header(reply, "X-Content-Type-Options", "nosniff");
    let reply = warp::reply::with_header(reply, "Referrer-Policy", "no-referrer");
    let reply = warp::reply::with_header(reply, "Content-Security-Policy", STRICT_CSP);
    // Tokens and stock levels must not end up in shared caches
    let reply = warp::reply::with_header(reply, "Cache-Control", "no-store");
    warp::reply::with_header(reply, "Permissions-Policy", PERMISSIONS_POLICY)
}
