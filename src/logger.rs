use crate::config::Config;
use chrono::Local;
use hyper::{Method, StatusCode, Uri, Version};
use std::net::SocketAddr;

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("InfoHub backend started successfully");
    println!("Listening on: http://{addr}");
    println!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!("Available endpoints:");
    println!("  - GET /api/quote");
    println!("  - GET /api/weather?city=YourCity");
    println!("  - GET /api/currency?amount=100");
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[Error] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("[{}] [Request] {method} {uri} {version:?}", timestamp());
}

pub fn log_response(path: &str, status: StatusCode) {
    println!("[{}] [Response] {path} - {status}", timestamp());
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[Headers] Count: {count}");
    }
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

/// Full upstream failure detail; never forwarded to the client.
pub fn log_upstream_error(endpoint: &str, detail: &str) {
    eprintln!("[ERROR] {endpoint}: {detail}");
}
