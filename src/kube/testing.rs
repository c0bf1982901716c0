//! In-memory discovery source and snapshot builders for tests.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::graph::{GraphSnapshot, ResourceEdge, ResourceNode};
use super::identity::{ResourceIdentity, encode};
use super::source::{ClusterId, FetchError, ResourceSource};

pub(crate) fn node(kind: &str, namespace: Option<&str>, name: &str) -> ResourceNode {
    ResourceNode {
        id: encode(&kind.to_ascii_lowercase(), namespace, name),
        kind: kind.to_owned(),
        name: name.to_owned(),
        namespace: namespace.map(str::to_owned),
        labels: BTreeMap::new(),
    }
}

pub(crate) fn edge(source: &str, target: &str) -> ResourceEdge {
    ResourceEdge {
        id: format!("edge:{source}->{target}"),
        source: source.to_owned(),
        target: target.to_owned(),
    }
}

/// `default` holds Deployment `web` and Pod `web-1`, `kube-system` holds
/// DaemonSet `proxy`; one edge `web -> web-1`.
pub(crate) fn two_namespace_snapshot() -> GraphSnapshot {
    GraphSnapshot {
        nodes: vec![
            node("Deployment", Some("default"), "web"),
            node("Pod", Some("default"), "web-1"),
            node("DaemonSet", Some("kube-system"), "proxy"),
        ],
        edges: vec![edge("deployment:default:web", "pod:default:web-1")],
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Request {
    Topology(String),
    Manifest {
        kind: String,
        namespace: String,
        name: String,
    },
    Logs {
        namespace: String,
        name: String,
        tail: usize,
    },
}

struct Reply<T> {
    delay: Duration,
    result: Result<T, String>,
}

impl<T> Reply<T> {
    async fn deliver(self) -> Result<T, FetchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.result.map_err(|message| FetchError::Server {
            status: 500,
            message,
        })
    }
}

/// Replays scripted replies in order and records every request it sees.
/// Unscripted calls succeed immediately with empty data.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    requests: Mutex<Vec<Request>>,
    topology: Mutex<VecDeque<Reply<GraphSnapshot>>>,
    manifests: Mutex<HashMap<String, Reply<String>>>,
    logs: Mutex<VecDeque<Reply<Vec<String>>>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_topology(&self, delay: Duration, result: Result<GraphSnapshot, &str>) {
        self.topology.lock().unwrap().push_back(Reply {
            delay,
            result: result.map_err(str::to_owned),
        });
    }

    pub(crate) fn set_manifest(&self, name: &str, delay: Duration, result: Result<&str, &str>) {
        self.manifests.lock().unwrap().insert(
            name.to_owned(),
            Reply {
                delay,
                result: result.map(str::to_owned).map_err(str::to_owned),
            },
        );
    }

    pub(crate) fn push_logs(&self, delay: Duration, result: Result<Vec<&str>, &str>) {
        self.logs.lock().unwrap().push_back(Reply {
            delay,
            result: result
                .map(|lines| lines.into_iter().map(str::to_owned).collect())
                .map_err(str::to_owned),
        });
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn topology_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| matches!(request, Request::Topology(_)))
            .count()
    }

    pub(crate) fn log_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|request| matches!(request, Request::Logs { .. }))
            .count()
    }

    fn record(&self, request: Request) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl ResourceSource for ScriptedSource {
    async fn fetch_topology(&self, cluster: &ClusterId) -> Result<GraphSnapshot, FetchError> {
        self.record(Request::Topology(cluster.to_string()));
        let reply = self.topology.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.deliver().await,
            None => Ok(GraphSnapshot::default()),
        }
    }

    async fn fetch_manifest(
        &self,
        _cluster: &ClusterId,
        resource: &ResourceIdentity,
    ) -> Result<String, FetchError> {
        self.record(Request::Manifest {
            kind: resource.api_kind().to_owned(),
            namespace: resource.namespace.clone(),
            name: resource.name.clone(),
        });
        let reply = self.manifests.lock().unwrap().remove(&resource.name);
        match reply {
            Some(reply) => reply.deliver().await,
            None => Ok(format!("name: {}\n", resource.name)),
        }
    }

    async fn fetch_logs(
        &self,
        _cluster: &ClusterId,
        namespace: &str,
        name: &str,
        tail: usize,
    ) -> Result<Vec<String>, FetchError> {
        self.record(Request::Logs {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            tail,
        });
        let reply = self.logs.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.deliver().await,
            None => Ok(Vec::new()),
        }
    }
}
