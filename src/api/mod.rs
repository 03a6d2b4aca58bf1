// API module entry
// Three stateless forwarders plus the health-check root

pub mod currency;
pub mod quote;
pub mod weather;

use crate::error::ApiError;
use crate::{logger, response};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Health-check root: service banner and the endpoint map.
pub fn handle_root() -> Response<Full<Bytes>> {
    response::json(
        StatusCode::OK,
        &serde_json::json!({
            "message": "InfoHub API is running!",
            "endpoints": {
                "quote": "/api/quote",
                "weather": "/api/weather?city=YourCity",
                "currency": "/api/currency?amount=100"
            }
        }),
    )
}

/// Collapse an `ApiError` into the failure envelope for one endpoint.
///
/// Client and configuration faults surface their own message; upstream
/// faults are logged with full detail and surface only `generic_message`.
pub(crate) fn failure(
    endpoint: &str,
    err: ApiError,
    generic_message: &str,
) -> Response<Full<Bytes>> {
    match err {
        ApiError::BadRequest(message) => {
            logger::log_warning(&format!("{endpoint}: {message}"));
            response::error(StatusCode::BAD_REQUEST, &message)
        }
        ApiError::Config(message) => {
            logger::log_error(&format!("{endpoint}: {message}"));
            response::error(StatusCode::INTERNAL_SERVER_ERROR, &message)
        }
        ApiError::Upstream(detail) => {
            logger::log_upstream_error(endpoint, &detail);
            response::error(StatusCode::INTERNAL_SERVER_ERROR, generic_message)
        }
    }
}
