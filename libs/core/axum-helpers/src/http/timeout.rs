use crate::errors::AppError;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Rewrite the bare 408 produced by `tower_http::timeout::TimeoutLayer`
/// into an error envelope. Must sit outside the timeout layer.
pub async fn timeout_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::Timeout.into_response();
    }
    response
}
