use axum::Router;
use axum_helpers::server::health_router;

pub mod health;
pub mod users;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest("/v1", users::router(state))
}

/// Creates a router with the /ready endpoint that performs a real database
/// round-trip. Merged with the stateless app router from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// The complete application router.
///
/// - `/api/v1/...`: user endpoints, with docs and middleware from `create_router`
/// - `/health`, `/version`: liveness with app name/version
/// - `/ready`: readiness with a database round-trip
pub fn app(state: &crate::state::AppState) -> Router {
    let router =
        axum_helpers::create_router::<crate::openapi::ApiDoc>(routes(state), &state.config.server);

    router
        .merge(health_router(state.config.app))
        .merge(ready_router(state.clone()))
}
