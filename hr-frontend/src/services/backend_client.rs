use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use service_core::observability::{TracedClientExt, TracedRequest};
use std::time::Duration;

use super::error::ClientError;
use crate::config::BackendSettings;

/// Credentials and correlation data forwarded from the browser request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub access_token: Option<String>,
    pub request_id: Option<String>,
}

/// Thin JSON client for the suite's REST backend.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(settings: &BackendSettings) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: &RequestContext,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let request = self.client.traced_get(&url).query(query);
        self.send(request, &url, ctx).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: &RequestContext,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let request = self.client.traced_post(&url).json(body);
        self.send(request, &url, ctx).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        ctx: &RequestContext,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.url(path);
        let request = self.client.traced_put(&url).json(body);
        self.send(request, &url, ctx).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        mut request: TracedRequest,
        url: &str,
        ctx: &RequestContext,
    ) -> Result<T, ClientError> {
        if let Some(token) = &ctx.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .request_id(ctx.request_id.as_deref())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to {}: {}", url, e);
                ClientError::Http(e)
            })?;

        decode(response, url).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ClientError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(url.to_string()));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, url, "Backend rejected request");
        return Err(ClientError::Status { status, body });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}
