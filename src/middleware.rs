//! HTTP middleware for request logging

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};

/// Log every request with method, path, status, duration and client IP.
pub async fn request_logging_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().path().to_string();

    // Real IP from X-Forwarded-For when behind a proxy, else the connection
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string());

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u32;
    let status_code = response.status().as_u16();

    tracing::info!(
        "{} {} {} {}ms from {}",
        method,
        uri,
        status_code,
        duration_ms,
        client_ip
    );

    response
}
