use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{security_headers, timeout_envelope};
use axum::{Json, Router, http::StatusCode, middleware, routing::get};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Path the OpenAPI document is served on.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Combine API routes with cross-cutting concerns.
///
/// Sets up:
/// - the OpenAPI document of `T` at [`OPENAPI_PATH`]
/// - API routes nested under `/api`
/// - request tracing, a per-request deadline, security headers, compression
/// - an error-envelope 404 fallback
///
/// Domain routers apply their own state before being passed in. Health
/// endpoints are merged by the app with [`health_router`](super::health_router).
///
/// # Example
/// ```ignore
/// use axum_helpers::server::create_router;
///
/// let api_routes = Router::new().nest("/v1", domain_users::handlers::router(service, signer));
/// let router = create_router::<ApiDoc>(api_routes, &server_config);
/// ```
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> Router
where
    T: OpenApi + 'static,
{
    let openapi = T::openapi();

    Router::new()
        .route(OPENAPI_PATH, get(move || async move { Json(openapi) }))
        .nest("/api", apis)
        .fallback(not_found)
        // Innermost first: the deadline covers handler and database work
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server_config.request_timeout(),
        ))
        .layer(middleware::from_fn(timeout_envelope))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(CompressionLayer::new())
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup`.
///
/// In-flight requests drain before `cleanup` starts. `cleanup` gets at most
/// `shutdown_timeout`; if it overruns, a warning is logged and the function
/// returns anyway.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::{close_database, create_production_app};
///
/// create_production_app(router, &config, Duration::from_secs(30), close_database(db, "primary")).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signals = coordinator.clone();
    tokio::spawn(async move { signals.listen_for_signals().await });

    let on_shutdown = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { on_shutdown.wait().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(_) => info!("Cleanup completed successfully"),
        Err(_) => tracing::warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}
