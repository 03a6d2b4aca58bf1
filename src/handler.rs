use crate::config::AppState;
use crate::{api, cors, logger, response};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// The fixed endpoint set; no routing beyond exact path match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Root,
    Quote,
    Weather,
    Currency,
    NotFound,
}

fn resolve(path: &str) -> Route {
    match path {
        "/" => Route::Root,
        "/api/quote" => Route::Quote,
        "/api/weather" => Route::Weather,
        "/api/currency" => Route::Currency,
        _ => Route::NotFound,
    }
}

/// Extract a single query parameter, percent-decoded.
fn query_param(uri: &hyper::Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    // Borrow url parsing from reqwest rather than splitting by hand
    let url = reqwest::Url::parse(&format!("http://localhost/?{query}")).ok()?;
    url.query_pairs()
        .find_map(|(key, value)| (key == name).then(|| value.into_owned()))
}

pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(&method, &uri, req.version());
    }
    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let origin = req
        .headers()
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    // Access policy first: disallowed origins never reach a forwarder
    if !cors::origin_allowed(origin.as_deref(), &state.allowed_origins) {
        logger::log_warning(&format!(
            "Rejected origin: {}",
            origin.as_deref().unwrap_or("")
        ));
        return Ok(cors::forbidden());
    }

    if method == Method::OPTIONS {
        return Ok(cors::preflight(origin.as_deref()));
    }
    if method != Method::GET {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return Ok(response::method_not_allowed());
    }

    let mut response = match resolve(&path) {
        Route::Root => api::handle_root(),
        Route::Quote => api::quote::handle(),
        Route::Weather => api::weather::handle(&state, query_param(&uri, "city")).await,
        Route::Currency => api::currency::handle(&state, query_param(&uri, "amount")).await,
        Route::NotFound => response::not_found(),
    };

    if let Some(origin) = origin.as_deref() {
        cors::apply_headers(&mut response, origin);
    }
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if access_log {
        logger::log_response(&path, response.status());
    }

    Ok(response)
}
