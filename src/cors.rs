//! Origin allow-list enforcement.
//!
//! Requests without an `Origin` header (server-to-server and tool calls)
//! are admitted. Requests from a listed origin get credentialed CORS
//! headers echoed back; everything else is rejected before routing.

use crate::response;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Response, StatusCode};

pub fn origin_allowed(origin: Option<&str>, allowed: &[String]) -> bool {
    match origin {
        None => true,
        Some(origin) => allowed.iter().any(|a| a == origin),
    }
}

/// 403 rejection for origins outside the allow-list. Carries no CORS
/// headers, so browsers refuse the response either way.
pub fn forbidden() -> Response<Full<Bytes>> {
    response::error(StatusCode::FORBIDDEN, "Not allowed by CORS")
}

/// Echo the caller's origin back with credentials allowed.
pub fn apply_headers(response: &mut Response<Full<Bytes>>, origin: &str) {
    let Ok(origin_value) = HeaderValue::from_str(origin) else {
        return;
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}

/// 204 preflight response advertising the read-only surface.
pub fn preflight(origin: Option<&str>) -> Response<Full<Bytes>> {
    let mut response = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS")
        .header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));

    if let Some(origin) = origin {
        apply_headers(&mut response, origin);
    }

    response
}
