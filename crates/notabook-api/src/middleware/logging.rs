//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Logs request method, path, status, and duration.
///
/// Public share URLs carry their token in the path, so those paths are
/// logged with the token masked.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = mask_share_token(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "HTTP request failed"
        );
    } else {
        info!(
            method = %method,
            path = %path,
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "HTTP request"
        );
    }

    response
}

fn mask_share_token(path: &str) -> String {
    match path.strip_prefix("/api/public/") {
        Some(rest) => match rest.split_once('/') {
            Some((_, tail)) => format!("/api/public/***/{tail}"),
            None => "/api/public/***".to_string(),
        },
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_share_token() {
        assert_eq!(
            mask_share_token("/api/public/abcdef/notes"),
            "/api/public/***/notes"
        );
        assert_eq!(mask_share_token("/api/notes"), "/api/notes");
    }
}
