//! Consul HTTP API client (agent catalog + KV).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode, Url};

use consul_demo_core::error::{DemoError, Result};

use super::{KvStore, Registration, ServiceRegistry};
use crate::config::AgentConfig;

const TOKEN_HEADER: &str = "X-Consul-Token";

#[derive(Debug, Clone)]
pub struct ConsulClient {
    http: HttpClient,
    base_url: Url,
    token: Option<String>,
}

impl ConsulClient {
    /// Build a client for the agent described by `cfg`. Does not contact the agent.
    pub fn new(cfg: &AgentConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .build()
            .map_err(|e| DemoError::Consul(format!("http client init failed: {e}")))?;
        let base_url = Url::parse(&cfg.base_url)
            .map_err(|e| DemoError::Consul(format!("invalid agent address {:?}: {e}", cfg.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(DemoError::Consul(format!("invalid agent address {:?}", cfg.base_url)));
        }
        Ok(Self {
            http,
            base_url,
            token: cfg.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `<base>/v1/<segments...>`, each segment percent-encoded on its own so
    /// `?`, `#` and `%` inside a key or service id stay part of the path.
    fn url<'a, I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| DemoError::Consul(format!("invalid agent address {:?}", self.base_url.as_str())))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.header(TOKEN_HEADER, token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, what: &str) -> Result<reqwest::Response> {
        self.authed(req)
            .send()
            .await
            .map_err(|e| DemoError::Consul(format!("{what} request failed: {e}")))
    }
}

async fn expect_success(resp: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(DemoError::Consul(format!("{what} returned {status}: {}", body.trim())))
}

#[async_trait]
impl KvStore for ConsulClient {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let url = self.url(std::iter::once("kv").chain(key.split('/')))?;
        let req = self.http.get(url).query(&[("raw", "")]);
        let resp = self.send(req, "kv get").await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = expect_success(resp, "kv get").await?;
        let body = resp
            .bytes()
            .await
            .map_err(|e| DemoError::Consul(format!("kv get body read failed: {e}")))?;
        Ok(Some(body))
    }
}

#[async_trait]
impl ServiceRegistry for ConsulClient {
    async fn register(&self, reg: &Registration) -> Result<()> {
        let url = self.url(["agent", "service", "register"])?;
        let req = self.http.put(url).json(reg);
        let resp = self.send(req, "service register").await?;
        expect_success(resp, "service register").await?;
        Ok(())
    }

    async fn deregister(&self, id: &str) -> Result<()> {
        let url = self.url(["agent", "service", "deregister", id])?;
        let req = self.http.put(url);
        let resp = self.send(req, "service deregister").await?;
        expect_success(resp, "service deregister").await?;
        Ok(())
    }
}
