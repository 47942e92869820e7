//! HTTP transport.
//!
//! [`HttpGateway`] is the seam between the API facade and the network:
//! it issues one GET and returns the parsed JSON body. [`ReqwestGateway`]
//! is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Result};

#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// GET `path` (relative to the base URL) with `params` as the query string.
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    http: reqwest::Client,
    base_url: String,
}

impl ReqwestGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoints are addressed with a trailing slash, as the service routes them.
    fn url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}/{}/", self.base_url, path)
        }
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn get_json(&self, path: &str, params: &[(String, String)]) -> Result<Value> {
        let url = self.url(path);
        tracing::debug!(%url, params = params.len(), "GET");
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await?;
        handle_response(resp).await
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        // The service reports errors as {"detail": "..."}
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && let Some(detail) = json.get("detail").and_then(|v| v.as_str())
        {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: detail.to_string(),
            });
        }
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_str(&body)?)
}
