use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::StatusEnvelope, axum_helpers::ErrorCode)),
    info(
        title = "Trove API",
        version = "0.1.0",
        description = "User account service: registration, login and profile management"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1", api = domain_users::ApiDoc)
    )
)]
pub struct ApiDoc;
