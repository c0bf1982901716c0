use std::path::PathBuf;

use async_trait::async_trait;

use super::graph::GraphSnapshot;
use super::identity::ResourceIdentity;
use super::source::{ClusterId, FetchError, ResourceSource};

/// Serves a snapshot saved on disk; the file is re-read on every fetch.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_snapshot(&self) -> Result<GraphSnapshot, FetchError> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[async_trait]
impl ResourceSource for FileSource {
    async fn fetch_topology(&self, _cluster: &ClusterId) -> Result<GraphSnapshot, FetchError> {
        self.read_snapshot().await
    }

    async fn fetch_manifest(
        &self,
        _cluster: &ClusterId,
        resource: &ResourceIdentity,
    ) -> Result<String, FetchError> {
        let snapshot = self.read_snapshot().await?;
        let node = snapshot.nodes.iter().find(|node| {
            node.name == resource.name
                && node.namespace.as_deref().unwrap_or_default() == resource.namespace
                && node.kind.eq_ignore_ascii_case(resource.api_kind())
        });

        match node {
            Some(node) => Ok(serde_json::to_string_pretty(node)?),
            None => Err(FetchError::Server {
                status: 404,
                message: format!(
                    "{} {} not found in {}",
                    resource.api_kind(),
                    resource.name,
                    self.path.display()
                ),
            }),
        }
    }

    async fn fetch_logs(
        &self,
        _cluster: &ClusterId,
        _namespace: &str,
        _name: &str,
        _tail: usize,
    ) -> Result<Vec<String>, FetchError> {
        Err(FetchError::Unavailable(
            "logs are not available for an offline snapshot".to_owned(),
        ))
    }
}
