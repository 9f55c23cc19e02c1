use axum::{Router, extract::Request, middleware};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    admin,
    app_state::AppState,
    config::Config,
    error::ErrorResponse,
    health,
    middleware::{RateLimit, rate_limit_middleware},
    news,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "newsdesk API", version = "0.1.0"),
    tags(
        (name = "health", description = "Liveness and database checks"),
        (name = "news", description = "Stored news items"),
        (name = "admin", description = "Ingestion and adaptation runs")
    ),
    components(schemas(ErrorResponse)),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Split router and OpenAPI document. Public and admin routes get their own
/// per-IP limits; health checks are not limited.
pub fn create_router(state: AppState, config: &Config) -> (Router, utoipa::openapi::OpenApi) {
    let public_limit = RateLimit::per_minute(config.public_rate_limit());
    let admin_limit = RateLimit::per_minute(config.admin_rate_limit());

    let health_routes = OpenApiRouter::new().routes(routes!(health::health_check));

    let news_routes = OpenApiRouter::new()
        .routes(routes!(
            news::handlers::create_news,
            news::handlers::list_news
        ))
        .routes(routes!(news::handlers::get_news))
        .layer(middleware::from_fn_with_state(
            public_limit,
            rate_limit_middleware,
        ));

    let admin_routes = OpenApiRouter::new()
        .routes(routes!(admin::handlers::ingest))
        .routes(routes!(admin::handlers::adapt_pending))
        .routes(routes!(admin::handlers::ingest_and_adapt))
        .layer(middleware::from_fn_with_state(
            admin_limit,
            rate_limit_middleware,
        ));

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(health_routes)
        .merge(news_routes)
        .merge(admin_routes)
        .with_state(state)
        .split_for_parts()
}

/// The full application: API routes, Swagger UI at `/docs`, request ids
/// and request tracing.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let (router, api) = create_router(state, config);

    router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", api))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
