use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::counter;
use service_core::error::AppError;
use service_core::middleware::tracing::RequestId;

use crate::access::RouteRequirement;
use crate::models::AccessContext;
use crate::services::RequestContext;
use crate::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Loads the caller's [`AccessContext`] and the [`RequestContext`] used for
/// backend calls into the request extensions.
pub async fn access_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext {
        access_token: bearer_token(request.headers()),
        request_id: request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.as_str().to_string()),
    };

    let access = state.session_source.access_context(&ctx).await;

    request.extensions_mut().insert(ctx);
    request.extensions_mut().insert(access);

    next.run(request).await
}

/// Route guard. Uses the same predicate as the navigation menu.
pub async fn require_access(
    State(requirement): State<RouteRequirement>,
    request: Request,
    next: Next,
) -> Response {
    let access = request.extensions().get::<AccessContext>();

    if access.is_some_and(|ctx| requirement.allows(ctx)) {
        return next.run(request).await;
    }

    counter!("access_denied_total", "permission" => requirement.permission).increment(1);
    tracing::warn!(
        permission = requirement.permission,
        feature = requirement.feature,
        path = %request.uri().path(),
        "Access denied"
    );

    match access.and_then(|ctx| ctx.user.as_ref()) {
        None => AppError::Unauthorized(anyhow::anyhow!("Sign in required")).into_response(),
        Some(_) => AppError::Forbidden(anyhow::anyhow!(
            "Missing permission {}",
            requirement.permission
        ))
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(AUTHORIZATION, "Basic Zm9vOmJhcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
