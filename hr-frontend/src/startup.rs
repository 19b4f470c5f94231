use axum::{
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use service_core::middleware::{metrics::metrics_middleware, tracing::request_id_middleware};
use tower_http::trace::TraceLayer;

use crate::access::navigation::{ROLE_CREATE, ROLE_READ, ROLE_UPDATE};
use crate::handlers::{
    app::health_check,
    metrics::metrics,
    navigation::get_navigation,
    roles::{
        create_role, get_catalog, get_role, list_roles, resolve_permissions, update_role,
    },
};
use crate::middleware::access::{access_context_middleware, require_access};
use crate::AppState;

fn api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/navigation", get(get_navigation))
        .route(
            "/permissions/catalog",
            get(get_catalog.layer(from_fn_with_state(ROLE_READ, require_access))),
        )
        .route(
            "/roles/resolve",
            post(resolve_permissions.layer(from_fn_with_state(ROLE_READ, require_access))),
        )
        .route(
            "/roles",
            get(list_roles.layer(from_fn_with_state(ROLE_READ, require_access)))
                .post(create_role.layer(from_fn_with_state(ROLE_CREATE, require_access))),
        )
        .route(
            "/roles/:id",
            get(get_role.layer(from_fn_with_state(ROLE_READ, require_access)))
                .put(update_role.layer(from_fn_with_state(ROLE_UPDATE, require_access))),
        )
        .layer(from_fn_with_state(state, access_context_middleware))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api_router(state.clone()))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the span above already sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
