use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::graph::GraphSnapshot;
use super::identity::ResourceIdentity;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClusterId(String);

impl ClusterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("failed to read snapshot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Unavailable(String),
}

/// The resource-discovery service as seen by the viewer.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch_topology(&self, cluster: &ClusterId) -> Result<GraphSnapshot, FetchError>;

    async fn fetch_manifest(
        &self,
        cluster: &ClusterId,
        resource: &ResourceIdentity,
    ) -> Result<String, FetchError>;

    async fn fetch_logs(
        &self,
        cluster: &ClusterId,
        namespace: &str,
        name: &str,
        tail: usize,
    ) -> Result<Vec<String>, FetchError>;
}
