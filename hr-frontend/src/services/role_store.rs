//! Role storage collaborator.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::backend_client::{BackendClient, RequestContext};
use super::error::ClientError;
use crate::models::{Role, RoleId, RolePayload};
use crate::utils::form_data::{flatten_serializable, FormSchema};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleFilter {
    pub name: Option<String>,
}

/// Page/size listing parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleQuery {
    pub page: u32,
    pub size: u32,
    pub filter: RoleFilter,
}

impl Default for RoleQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
            filter: RoleFilter::default(),
        }
    }
}

static ROLE_QUERY_SCHEMA: Lazy<FormSchema> = Lazy::new(|| {
    FormSchema::new()
        .scalar("page")
        .scalar("size")
        .nested("filter", FormSchema::new().scalar("name"))
});

impl RoleQuery {
    /// Query-string pairs, e.g. `page=2&size=20&filter.name=HR`.
    pub fn to_pairs(&self) -> Result<Vec<(String, String)>, ClientError> {
        Ok(flatten_serializable(&ROLE_QUERY_SCHEMA, self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePage {
    pub items: Vec<Role>,
    #[serde(default)]
    pub total: u64,
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn create(
        &self,
        ctx: &RequestContext,
        payload: &RolePayload,
    ) -> Result<Role, ClientError>;

    async fn update(
        &self,
        ctx: &RequestContext,
        id: &RoleId,
        payload: &RolePayload,
    ) -> Result<Role, ClientError>;

    async fn get(&self, ctx: &RequestContext, id: &RoleId) -> Result<Role, ClientError>;

    async fn list(&self, ctx: &RequestContext, query: &RoleQuery) -> Result<RolePage, ClientError>;
}

/// [`RoleStore`] backed by the `/roles` REST endpoints. No retries.
pub struct HttpRoleStore {
    backend: Arc<BackendClient>,
}

impl HttpRoleStore {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl RoleStore for HttpRoleStore {
    async fn create(
        &self,
        ctx: &RequestContext,
        payload: &RolePayload,
    ) -> Result<Role, ClientError> {
        self.backend.post_json("/roles", ctx, payload).await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        id: &RoleId,
        payload: &RolePayload,
    ) -> Result<Role, ClientError> {
        self.backend
            .put_json(&format!("/roles/{}", id), ctx, payload)
            .await
    }

    async fn get(&self, ctx: &RequestContext, id: &RoleId) -> Result<Role, ClientError> {
        self.backend
            .get_json(&format!("/roles/{}", id), ctx, &[])
            .await
    }

    async fn list(&self, ctx: &RequestContext, query: &RoleQuery) -> Result<RolePage, ClientError> {
        let pairs = query.to_pairs()?;
        self.backend.get_json("/roles", ctx, &pairs).await
    }
}
