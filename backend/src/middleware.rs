// src/middleware.rs

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Log one line per request: method, path, status, and latency.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status >= 400 {
        warn!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration_ms,
            "Request completed with error"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = status,
            duration_ms = duration_ms,
            "Request completed"
        );
    }

    response
}
