use std::collections::HashSet;

use eframe::egui::Vec2;

use crate::kube::identity::encode;
use crate::kube::{GraphSnapshot, GroupKey, ResourceEdge, ResourceNode};
use crate::layout::{LayoutMode, grid_layout};

use super::super::navigation::NavigationState;

const KIND_ORDER: [&str; 9] = [
    "namespace",
    "deployment",
    "statefulset",
    "daemonset",
    "replicaset",
    "pod",
    "service",
    "hpa",
    "node",
];

/// Position of a kind in the controller-first ordering used inside a group.
pub fn kind_rank(kind: &str) -> usize {
    let kind = kind.to_ascii_lowercase();
    let kind = if kind == "horizontalpodautoscaler" {
        "hpa"
    } else {
        kind.as_str()
    };
    KIND_ORDER
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or(KIND_ORDER.len())
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeRole {
    Group { key: GroupKey, count: usize },
    Resource { kind: String, name: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
    pub position: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableView {
    pub mode: LayoutMode,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<ResourceEdge>,
}

impl RenderableView {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Projection {
    /// The snapshot has exactly one group and nothing is expanded yet; the
    /// caller expands it and projects again.
    AutoExpand(GroupKey),
    View(RenderableView),
}

pub fn group_node_id(key: &GroupKey) -> String {
    encode("group", None, key.as_str())
}

pub fn project(snapshot: &GraphSnapshot, nav: &NavigationState) -> Projection {
    match &nav.expanded_group {
        Some(group) => Projection::View(project_detail(snapshot, group)),
        None => {
            let groups = snapshot.group_summaries();
            if let [only] = groups.as_slice() {
                return Projection::AutoExpand(only.key.clone());
            }

            let logical = groups
                .into_iter()
                .map(|group| {
                    (
                        group_node_id(&group.key),
                        group.key.to_string(),
                        NodeRole::Group {
                            key: group.key,
                            count: group.count,
                        },
                    )
                })
                .collect::<Vec<_>>();

            Projection::View(place(logical, Vec::new(), LayoutMode::Overview))
        }
    }
}

fn project_detail(snapshot: &GraphSnapshot, group: &GroupKey) -> RenderableView {
    let mut seen = HashSet::new();
    let mut members = snapshot
        .nodes
        .iter()
        .filter(|node| group.contains(node))
        .filter(|node| seen.insert(node.id.as_str()))
        .collect::<Vec<&ResourceNode>>();
    members.sort_by_key(|node| kind_rank(&node.kind));

    let edges = snapshot
        .edges
        .iter()
        .filter(|edge| seen.contains(edge.source.as_str()) && seen.contains(edge.target.as_str()))
        .cloned()
        .collect::<Vec<_>>();

    let logical = members
        .into_iter()
        .map(|node| {
            (
                node.id.clone(),
                node.label(),
                NodeRole::Resource {
                    kind: node.kind.clone(),
                    name: node.name.clone(),
                },
            )
        })
        .collect::<Vec<_>>();

    place(logical, edges, LayoutMode::Detail)
}

fn place(
    logical: Vec<(String, String, NodeRole)>,
    edges: Vec<ResourceEdge>,
    mode: LayoutMode,
) -> RenderableView {
    let ids = logical
        .iter()
        .map(|(id, _, _)| id.clone())
        .collect::<Vec<_>>();
    let positions = grid_layout(&ids, mode);

    let nodes = logical
        .into_iter()
        .zip(positions)
        .map(|((id, label, role), position)| PositionedNode {
            id,
            label,
            role,
            position,
        })
        .collect();

    RenderableView { mode, nodes, edges }
}
