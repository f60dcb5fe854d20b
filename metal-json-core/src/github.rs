//! HTTP [`ContentStore`] for the GitHub repository contents API.
//!
//! - `GET  {api_base}/repos/{repo}/contents/{path}`
//! - `PUT  {api_base}/repos/{repo}/contents/{path}`
//!
//! Both requests send `Authorization: token {token}`. Responses are returned
//! as-is; status interpretation happens in [`crate::publish`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, error, info};

use crate::contract::{ContentStore, ContentTarget, PutContentBody, StoreResponse};
use crate::publish::PublishError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const ACCEPT_V3: &str = "application/vnd.github.v3+json";

pub struct GitHubClient {
    client: Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_base)
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            error!(error = ?e, "Failed to build HTTP client");
            PublishError::Transport(e)
        })?;
        Ok(Self::with_client(client, api_base))
    }

    pub fn with_client(client: Client, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        info!(api_base = %api_base, "Initialized content store client");
        GitHubClient { client, api_base }
    }

    pub fn contents_url(&self, target: &ContentTarget) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.api_base,
            target.repo.trim_matches('/'),
            target.path.trim_start_matches('/')
        )
    }

    fn authorize(&self, builder: RequestBuilder, target: &ContentTarget) -> RequestBuilder {
        builder
            .header(AUTHORIZATION, format!("token {}", target.token.expose()))
            .header(ACCEPT, ACCEPT_V3)
            .header(USER_AGENT, concat!("metal-json/", env!("CARGO_PKG_VERSION")))
    }

    async fn send(&self, builder: RequestBuilder, url: &str) -> Result<StoreResponse, PublishError> {
        let resp = builder.send().await.map_err(|e| {
            error!(error = ?e, url = %url, "Request to content store failed");
            PublishError::Transport(e)
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            error!(error = ?e, url = %url, status, "Failed to read content store response body");
            PublishError::Transport(e)
        })?;
        debug!(url = %url, status, body_len = body.len(), "Content store responded");
        Ok(StoreResponse { status, body })
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        GitHubClient::new(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl ContentStore for GitHubClient {
    async fn get_content(&self, target: &ContentTarget) -> Result<StoreResponse, PublishError> {
        let url = self.contents_url(target);
        info!(url = %url, "Looking up existing file");
        let builder = self.authorize(self.client.get(&url), target);
        self.send(builder, &url).await
    }

    async fn put_content(
        &self,
        target: &ContentTarget,
        body: &PutContentBody,
    ) -> Result<StoreResponse, PublishError> {
        let url = self.contents_url(target);
        info!(url = %url, replacing = body.sha.is_some(), "Uploading file");
        let builder = self.authorize(self.client.put(&url), target).json(body);
        self.send(builder, &url).await
    }
}
