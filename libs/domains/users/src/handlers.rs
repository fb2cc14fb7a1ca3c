use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use axum_helpers::{
    ApiResponse, AuthUser, SharedTokenSigner, StatusEnvelope, ValidatedJson, jwt_auth_middleware,
};
use std::sync::Arc;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::UserResult;
use crate::models::{
    LoginRequest, LoginResponse, ProfileResponse, RegisterRequest, UpdateProfileRequest,
};
use crate::repository::UserRepository;
use crate::service::UserService;

pub const TAG: &str = "users";

/// OpenAPI documentation for the Users API
#[derive(OpenApi)]
#[openapi(
    paths(register, login, get_profile, update_profile),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        ProfileResponse,
        UpdateProfileRequest,
        StatusEnvelope
    )),
    modifiers(&BearerAuth),
    tags((name = TAG, description = "Account registration, login and profile"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// Create the users router with all HTTP endpoints
///
/// `/user` requires a bearer token issued by `signer`.
pub fn router<R: UserRepository + 'static>(
    service: UserService<R>,
    signer: SharedTokenSigner,
) -> Router {
    let shared_service = Arc::new(service);

    let protected = Router::new()
        .route("/user", get(get_profile::<R>).put(update_profile::<R>))
        .route_layer(middleware::from_fn_with_state(signer, jwt_auth_middleware));

    Router::new()
        .route("/register", post(register::<R>))
        .route("/login", post(login::<R>))
        .merge(protected)
        .with_state(shared_service)
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    tag = TAG,
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = StatusEnvelope),
        (status = 400, description = "Invalid input or email already registered", body = StatusEnvelope),
        (status = 500, description = "Storage failure", body = StatusEnvelope)
    )
)]
async fn register<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> UserResult<ApiResponse<()>> {
    service.register(input).await?;
    Ok(ApiResponse::empty())
}

/// Exchange email and password for an access token
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Access token issued", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid input", body = StatusEnvelope),
        (status = 401, description = "Unknown account or wrong password", body = StatusEnvelope)
    )
)]
async fn login<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<ApiResponse<LoginResponse>> {
    let token = service.login(input).await?;
    Ok(ApiResponse::ok(token))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/user",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current profile", body = ApiResponse<ProfileResponse>),
        (status = 400, description = "Account no longer exists", body = StatusEnvelope),
        (status = 401, description = "Missing or invalid token", body = StatusEnvelope)
    )
)]
async fn get_profile<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    auth: AuthUser,
) -> UserResult<ApiResponse<ProfileResponse>> {
    let profile = service.get_profile(&auth.user_id).await?;
    Ok(ApiResponse::ok(profile))
}

/// Replace email and nickname of the authenticated user
#[utoipa::path(
    put,
    path = "/user",
    tag = TAG,
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = StatusEnvelope),
        (status = 400, description = "Invalid input or unknown account", body = StatusEnvelope),
        (status = 401, description = "Missing or invalid token", body = StatusEnvelope)
    )
)]
async fn update_profile<R: UserRepository + 'static>(
    State(service): State<Arc<UserService<R>>>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> UserResult<ApiResponse<()>> {
    service.update_profile(&auth.user_id, input).await?;
    Ok(ApiResponse::empty())
}
