use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceNode {
    pub id: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ResourceNode {
    pub fn group_key(&self) -> GroupKey {
        GroupKey::for_namespace(self.namespace.as_deref())
    }

    pub fn label(&self) -> String {
        format!("{}: {}", self.kind, self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

/// One full capture of a cluster's resources and their relations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<ResourceNode>,
    #[serde(default)]
    pub edges: Vec<ResourceEdge>,
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &str) -> Option<&ResourceNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Groups ordered by namespace name, with the global group last.
    pub fn group_summaries(&self) -> Vec<GroupSummary> {
        let mut counts: HashMap<GroupKey, usize> = HashMap::new();
        for node in &self.nodes {
            *counts.entry(node.group_key()).or_default() += 1;
        }

        let mut groups = counts
            .into_iter()
            .map(|(key, count)| GroupSummary { key, count })
            .collect::<Vec<_>>();
        groups.sort_by(|a, b| a.key.cmp(&b.key));
        groups
    }
}

/// Resources sharing a namespace, or the global bucket for namespace-less ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Namespace(String),
    Global,
}

impl GroupKey {
    pub const GLOBAL_LABEL: &'static str = "(cluster-scoped)";

    pub fn for_namespace(namespace: Option<&str>) -> Self {
        match namespace {
            Some(namespace) if !namespace.is_empty() => Self::Namespace(namespace.to_owned()),
            _ => Self::Global,
        }
    }

    pub fn contains(&self, node: &ResourceNode) -> bool {
        match (self, node.namespace.as_deref()) {
            (Self::Namespace(key), Some(namespace)) => key == namespace,
            (Self::Global, namespace) => namespace.is_none_or(str::is_empty),
            (Self::Namespace(_), None) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Namespace(namespace) => namespace,
            Self::Global => Self::GLOBAL_LABEL,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub count: usize,
}
