use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::Deserialize;

use super::graph::GraphSnapshot;
use super::identity::ResourceIdentity;
use super::source::{ClusterId, FetchError, ResourceSource};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct LogsBody {
    #[serde(default)]
    lines: Option<Vec<String>>,
}

/// Discovery service client speaking the `/api/v1` JSON protocol.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid discovery service URL {base_url:?}"))?;
        if base_url.cannot_be_a_base() {
            bail!("discovery service URL {base_url} cannot carry a path");
        }

        Ok(Self {
            client,
            base_url,
            token: token.filter(|token| !token.is_empty()),
        })
    }

    /// Appends `segments` to the base path, percent-encoding each one so a
    /// cluster id can never change the route.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn get(&self, segments: &[&str]) -> RequestBuilder {
        let request = self.client.get(self.endpoint(segments));
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn topology_request(&self, cluster: &ClusterId) -> RequestBuilder {
        self.get(&["topology", cluster.as_str()])
            .query(&[("namespace", "all")])
    }

    fn manifest_request(&self, cluster: &ClusterId, resource: &ResourceIdentity) -> RequestBuilder {
        self.get(&["clusters", cluster.as_str(), "resources", "yaml"]).query(&[
            ("kind", resource.api_kind()),
            ("namespace", resource.namespace.as_str()),
            ("name", resource.name.as_str()),
        ])
    }

    fn logs_request(
        &self,
        cluster: &ClusterId,
        namespace: &str,
        name: &str,
        tail: usize,
    ) -> RequestBuilder {
        let tail = tail.to_string();
        self.get(&["clusters", cluster.as_str(), "resources", "logs"]).query(&[
            ("namespace", namespace),
            ("name", name),
            ("tail", tail.as_str()),
        ])
    }
}

async fn send(request: RequestBuilder) -> Result<String, FetchError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(FetchError::Server {
            status: status.as_u16(),
            message: server_error_message(status, &body),
        })
    }
}

fn server_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_owned()
    } else {
        trimmed.to_owned()
    }
}

// The service wraps manifests in a JSON string; plain text bodies pass through.
fn decode_manifest(body: String) -> String {
    serde_json::from_str::<String>(&body).unwrap_or(body)
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch_topology(&self, cluster: &ClusterId) -> Result<GraphSnapshot, FetchError> {
        let body = send(self.topology_request(cluster)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn fetch_manifest(
        &self,
        cluster: &ClusterId,
        resource: &ResourceIdentity,
    ) -> Result<String, FetchError> {
        let body = send(self.manifest_request(cluster, resource)).await?;
        Ok(decode_manifest(body))
    }

    async fn fetch_logs(
        &self,
        cluster: &ClusterId,
        namespace: &str,
        name: &str,
        tail: usize,
    ) -> Result<Vec<String>, FetchError> {
        let body = send(self.logs_request(cluster, namespace, name, tail)).await?;
        let parsed: LogsBody = serde_json::from_str(&body)?;
        Ok(parsed.lines.unwrap_or_default())
    }
}
