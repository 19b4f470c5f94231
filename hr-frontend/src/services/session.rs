//! User/session collaborator: who is signed in and which features are on.

use async_trait::async_trait;
use std::sync::Arc;

use super::backend_client::{BackendClient, RequestContext};
use super::error::ClientError;
use crate::models::{AccessContext, FeatureToggles, User};

#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn current_user(&self, ctx: &RequestContext) -> Result<User, ClientError>;

    async fn feature_toggles(&self, ctx: &RequestContext) -> Result<FeatureToggles, ClientError>;

    /// Load both halves of the access context. Failures degrade to an
    /// absent user or empty toggles, so gates deny instead of erroring.
    async fn access_context(&self, ctx: &RequestContext) -> AccessContext {
        if ctx.access_token.is_none() {
            return AccessContext::anonymous();
        }

        let (user, features) = tokio::join!(self.current_user(ctx), self.feature_toggles(ctx));

        let user = user
            .map_err(|e| tracing::warn!(error = %e, "Failed to load session user"))
            .ok();
        let features = features
            .map_err(|e| tracing::warn!(error = %e, "Failed to load feature toggles"))
            .unwrap_or_default();

        AccessContext::new(user, features)
    }
}

pub struct HttpSessionSource {
    backend: Arc<BackendClient>,
}

impl HttpSessionSource {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SessionSource for HttpSessionSource {
    async fn current_user(&self, ctx: &RequestContext) -> Result<User, ClientError> {
        self.backend.get_json("/employees/me", ctx, &[]).await
    }

    async fn feature_toggles(&self, ctx: &RequestContext) -> Result<FeatureToggles, ClientError> {
        self.backend
            .get_json("/settings/feature-toggles", ctx, &[])
            .await
    }
}
