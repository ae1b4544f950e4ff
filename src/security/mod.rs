//! Security utilities for HTTP responses

pub mod headers;

pub use headers::with_api_security_headers;
