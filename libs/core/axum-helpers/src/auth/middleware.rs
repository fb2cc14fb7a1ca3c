use super::jwt::SharedTokenSigner;
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

/// Identity of the caller, placed in request extensions by
/// [`jwt_auth_middleware`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Public user id taken from the token subject
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extract JWT from Authorization header: "Bearer <token>"
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware
///
/// Verifies the bearer token and inserts [`AuthUser`] into request
/// extensions. Missing or invalid tokens get a 401 envelope.
///
/// # Example
///
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::auth::{JwtAuth, SharedTokenSigner, jwt_auth_middleware};
/// use std::sync::Arc;
///
/// let signer: SharedTokenSigner = Arc::new(JwtAuth::new(&config));
///
/// let protected_routes = Router::new()
///     .route("/user", get(get_profile))
///     .layer(axum::middleware::from_fn_with_state(signer, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(signer): State<SharedTokenSigner>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_bearer(request.headers()) else {
        tracing::debug!("No bearer token in Authorization header");
        return Err(AppError::unauthorized("No token provided"));
    };

    let user_id = signer.verify(token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::unauthorized("Invalid token")
    })?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}
