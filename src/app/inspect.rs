use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::kube::identity::decode;
use crate::kube::{ClusterId, FetchError, ResourceIdentity, ResourceSource};
use crate::util::format_clock;

use super::Repaint;

pub const MANIFEST_PENDING: &str = "Loading manifest...";
pub const LOGS_PENDING: &str = "Loading logs...";
pub const LOGS_NOT_APPLICABLE: &str = "Logs not applicable: only Pod resources have logs.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ManifestView {
    Idle,
    Pending,
    Ready(String),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogView {
    Idle,
    NotApplicable,
    Pending,
    Lines {
        lines: Vec<String>,
        updated_at: String,
    },
    Failed {
        message: String,
        updated_at: String,
    },
}

enum InspectionUpdate {
    Manifest {
        epoch: u64,
        result: Result<String, FetchError>,
    },
    Logs {
        epoch: u64,
        fetched_at: DateTime<Local>,
        result: Result<Vec<String>, FetchError>,
    },
}

impl InspectionUpdate {
    fn epoch(&self) -> u64 {
        match self {
            Self::Manifest { epoch, .. } | Self::Logs { epoch, .. } => *epoch,
        }
    }
}

#[derive(Clone, Debug)]
struct Selection {
    node_id: String,
    identity: ResourceIdentity,
}

/// Manifest and log retrieval for the selected node.
///
/// Everything is keyed on the navigation selection epoch: changing it
/// aborts the running fetch tasks, and any result still carrying an older
/// epoch is discarded when it is drained.
pub struct Inspector {
    source: Arc<dyn ResourceSource>,
    runtime: Handle,
    cluster: ClusterId,
    log_interval: Duration,
    log_tail: usize,
    repaint: Repaint,
    epoch: u64,
    selection: Option<Selection>,
    manifest: ManifestView,
    logs: LogView,
    tasks: Vec<JoinHandle<()>>,
    tx: UnboundedSender<InspectionUpdate>,
    rx: UnboundedReceiver<InspectionUpdate>,
}

impl Inspector {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        runtime: Handle,
        cluster: ClusterId,
        log_interval: Duration,
        log_tail: usize,
        repaint: Repaint,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            runtime,
            cluster,
            log_interval,
            log_tail,
            repaint,
            epoch: 0,
            selection: None,
            manifest: ManifestView::Idle,
            logs: LogView::Idle,
            tasks: Vec::new(),
            tx,
            rx,
        }
    }

    pub fn manifest(&self) -> &ManifestView {
        &self.manifest
    }

    pub fn logs(&self) -> &LogView {
        &self.logs
    }

    pub fn identity(&self) -> Option<&ResourceIdentity> {
        self.selection.as_ref().map(|selection| &selection.identity)
    }

    pub fn selected_node_id(&self) -> Option<&str> {
        self.selection
            .as_ref()
            .map(|selection| selection.node_id.as_str())
    }

    /// Follows the navigation selection. A no-op while `epoch` is unchanged.
    pub fn sync_selection(&mut self, epoch: u64, node_id: Option<&str>) {
        if epoch == self.epoch {
            return;
        }

        self.cancel();
        self.epoch = epoch;
        self.selection = node_id.map(|node_id| Selection {
            node_id: node_id.to_owned(),
            identity: decode(node_id),
        });

        let Some(selection) = self.selection.clone() else {
            self.manifest = ManifestView::Idle;
            self.logs = LogView::Idle;
            return;
        };

        tracing::debug!(node = %selection.node_id, epoch, "inspecting node");
        self.manifest = ManifestView::Pending;
        self.spawn_manifest(selection.identity.clone());

        if selection.identity.is_pod() {
            self.logs = LogView::Pending;
            self.spawn_logs(selection.identity);
        } else {
            self.logs = LogView::NotApplicable;
        }
    }

    /// Drains finished fetches. Returns true when a panel changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(update) = self.rx.try_recv() {
            changed |= self.apply(update);
        }
        changed
    }

    fn cancel(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn apply(&mut self, update: InspectionUpdate) -> bool {
        if update.epoch() != self.epoch {
            tracing::debug!(
                stale = update.epoch(),
                current = self.epoch,
                "discarding inspection result for a previous selection"
            );
            return false;
        }

        match update {
            InspectionUpdate::Manifest { result, .. } => {
                self.manifest = match result {
                    Ok(text) => ManifestView::Ready(text),
                    Err(error) => {
                        tracing::warn!(%error, "manifest fetch failed");
                        ManifestView::Failed(format!("Failed to load manifest: {error}"))
                    }
                };
            }
            InspectionUpdate::Logs {
                fetched_at, result, ..
            } => {
                let updated_at = format_clock(fetched_at);
                self.logs = match result {
                    Ok(lines) => LogView::Lines { lines, updated_at },
                    Err(error) => {
                        tracing::warn!(%error, "log fetch failed, will retry on next tick");
                        LogView::Failed {
                            message: format!("Failed to load logs: {error}"),
                            updated_at,
                        }
                    }
                };
            }
        }
        true
    }

    fn spawn_manifest(&mut self, identity: ResourceIdentity) {
        let source = Arc::clone(&self.source);
        let cluster = self.cluster.clone();
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);
        let epoch = self.epoch;

        self.tasks.push(self.runtime.spawn(async move {
            let result = source.fetch_manifest(&cluster, &identity).await;
            if tx.send(InspectionUpdate::Manifest { epoch, result }).is_ok() {
                repaint();
            }
        }));
    }

    fn spawn_logs(&mut self, identity: ResourceIdentity) {
        let source = Arc::clone(&self.source);
        let cluster = self.cluster.clone();
        let tx = self.tx.clone();
        let repaint = Arc::clone(&self.repaint);
        let epoch = self.epoch;
        let interval = self.log_interval;
        let tail = self.log_tail;

        self.tasks.push(self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = source
                    .fetch_logs(&cluster, &identity.namespace, &identity.name, tail)
                    .await;
                let update = InspectionUpdate::Logs {
                    epoch,
                    fetched_at: Local::now(),
                    result,
                };
                if tx.send(update).is_err() {
                    break;
                }
                repaint();
            }
        }));
    }
}

impl Drop for Inspector {
    fn drop(&mut self) {
        self.cancel();
    }
}
